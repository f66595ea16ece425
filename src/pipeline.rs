use crate::cancel::CancellationToken;
use crate::classifier::{classify, GestureType};
use crate::config::EngineParams;
use crate::decoder::{BeamSearch, DecodedWord};
use crate::error::{GlideError, GtResult};
use crate::input::{GestureData, PredictionResult, SwipeInput};
use crate::keyboard::KeyboardLayout;
use crate::lexicon::{CandidateSource, WORST_RANK};
use crate::model::ModelHandle;
use crate::ranker::{Candidate, SuggestionRanker, WordSource};
use crate::resampler::resample;
use crate::vocab::VocabularyTrie;
use std::time::Instant;
use tracing::{debug, warn};

/// Language code attached to decoded words no dictionary recognizes.
const UNDETERMINED_LANG: &str = "und";

/// The swipe-to-word pipeline: classifier → resampler → decoder → ranker,
/// run as one single-shot, non-resumable computation per gesture. No stage
/// starts before its predecessor's full output exists.
///
/// Every failure path degrades to an empty [`PredictionResult`]: tap typing
/// must stay usable, so nothing here panics and no error text is surfaced.
/// The asymmetric model-error policy is deliberate: an `encode` failure has
/// no per-beam granularity and aborts the whole gesture, while `decode_step`
/// failures are absorbed beam-by-beam inside the search.
pub struct SwipePipeline {
    handle: ModelHandle,
    keyboard: KeyboardLayout,
    params: EngineParams,
    ranker: SuggestionRanker,
    trie: Option<VocabularyTrie>,
}

impl SwipePipeline {
    pub fn new(handle: ModelHandle, keyboard: KeyboardLayout, params: EngineParams) -> Self {
        let ranker = SuggestionRanker::from_params(&params.ranker);
        Self {
            handle,
            keyboard,
            params,
            ranker,
            trie: None,
        }
    }

    /// Constrain decoding to a dictionary trie (recommended; without it the
    /// decoder may emit arbitrary letter sequences).
    pub fn with_trie(mut self, trie: VocabularyTrie) -> Self {
        self.trie = Some(trie);
        self
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Tear down the model backend. Consumes the pipeline.
    pub fn shutdown(self) {
        self.handle.cleanup();
    }

    /// Derive the classifier's input from the raw trajectory and the key
    /// under the initial touch point. When the gesture starts off-key, "has
    /// left the starting key" falls back to straying a half key width from
    /// the first sample.
    pub fn gesture_data(&self, input: &SwipeInput) -> GestureData {
        let key_width = self.keyboard.key_width;
        let Some(&first) = input.coordinates.first() else {
            return GestureData {
                has_left_starting_key: false,
                total_distance: 0.0,
                time_elapsed_ms: 0,
                key_width,
            };
        };

        let has_left = match self.keyboard.key_at(first).and_then(|c| self.keyboard.key_center(c)) {
            Some(center) => input.coordinates.iter().any(|p| {
                (p.x - center.x).abs() > self.keyboard.key_width / 2.0
                    || (p.y - center.y).abs() > self.keyboard.key_height / 2.0
            }),
            None => input
                .coordinates
                .iter()
                .any(|p| p.distance(&first) > key_width / 2.0),
        };

        GestureData {
            has_left_starting_key: has_left,
            total_distance: input.path_length(),
            time_elapsed_ms: input.duration_ms(),
            key_width,
        }
    }

    /// Run the full pipeline for one completed gesture.
    pub fn predict(
        &self,
        input: &SwipeInput,
        source: &dyn CandidateSource,
        cancel: &CancellationToken,
    ) -> PredictionResult {
        self.predict_with_context(input, None, source, cancel)
    }

    /// Like [`predict`](Self::predict), but boosts candidates that closely
    /// complete an already-typed prefix.
    pub fn predict_with_context(
        &self,
        input: &SwipeInput,
        typed_prefix: Option<&str>,
        source: &dyn CandidateSource,
        cancel: &CancellationToken,
    ) -> PredictionResult {
        // Stage 1: gate on gesture classification.
        let gesture = self.gesture_data(input);
        if classify(&gesture, self.params.classifier.tap_duration_threshold_ms)
            == GestureType::Tap
        {
            debug!("classified as tap, skipping swipe prediction");
            return PredictionResult::empty();
        }

        match self.run_swipe_stages(input, typed_prefix, source, cancel) {
            Ok(result) => result,
            // Recoverable by contract: the suggestion bar just stays empty.
            Err(GlideError::InsufficientPoints(points)) => {
                debug!(points, "trajectory too short");
                PredictionResult::empty()
            }
            Err(GlideError::DecodeExhausted) => {
                debug!("decode produced no beams");
                PredictionResult::empty()
            }
            // An encode failure has no per-beam granularity: the whole
            // gesture is abandoned.
            Err(err) => {
                warn!(%err, "swipe prediction failed");
                PredictionResult::empty()
            }
        }
    }

    fn run_swipe_stages(
        &self,
        input: &SwipeInput,
        typed_prefix: Option<&str>,
        source: &dyn CandidateSource,
        cancel: &CancellationToken,
    ) -> GtResult<PredictionResult> {
        let started = Instant::now();
        let backend = self.handle.backend();

        // Stage 2: normalize to the model's fixed input shape.
        let resampled = resample(
            &input.coordinates,
            backend.input_len(),
            self.params.decoder.resampling_mode,
        )?;

        // Stage 3: encode once, then beam-search.
        let state = backend.encode(&resampled)?;

        let mut search = BeamSearch::new(backend.as_ref(), &self.params.decoder);
        if let Some(trie) = &self.trie {
            search = search.with_trie(trie);
        }

        let beams = search.decode(&state, cancel);
        if beams.is_empty() {
            if cancel.is_cancelled() {
                debug!("gesture cancelled mid-decode");
                return Ok(PredictionResult::empty());
            }
            return Err(GlideError::DecodeExhausted);
        }
        let decoded = search.into_candidates(beams);

        // Stage 4: dictionary lookup and ranking.
        let mut primary = Vec::new();
        let mut secondary = Vec::new();
        for word in &decoded {
            let Some(candidate) = self.to_candidate(word, source) else {
                continue;
            };
            match candidate.source {
                WordSource::Secondary => secondary.push(candidate),
                _ => primary.push(candidate),
            }
        }

        if let Some(prefix) = typed_prefix.filter(|p| !p.is_empty()) {
            primary = self.ranker.apply_prefix_boost(&primary, prefix);
            secondary = self.ranker.apply_prefix_boost(&secondary, prefix);
        }

        let suggestions =
            self.ranker
                .rank_and_merge(&primary, &secondary, self.params.ranker.max_results);

        debug!(
            decoded = decoded.len(),
            ranked = suggestions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline complete"
        );

        let mut words = Vec::with_capacity(suggestions.len());
        let mut scores = Vec::with_capacity(suggestions.len());
        for s in suggestions {
            words.push(s.word);
            scores.push(s.score);
        }
        Ok(PredictionResult::new(words, scores))
    }

    fn to_candidate(&self, word: &DecodedWord, source: &dyn CandidateSource) -> Option<Candidate> {
        let boost = source.personalization_boost(&word.word).clamp(0.5, 2.0);
        let confidence = (word.confidence * boost).min(1.0);

        match source.lookup(&word.word) {
            Some(entry) => Some(Candidate::new(
                entry.word,
                entry.frequency_rank,
                entry.source,
                confidence,
                entry.language_code,
            )),
            None if self.params.ranker.keep_out_of_vocabulary => Some(Candidate::new(
                word.word.clone(),
                WORST_RANK,
                WordSource::Main,
                confidence,
                UNDETERMINED_LANG,
            )),
            None => None,
        }
    }
}

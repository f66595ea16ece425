pub mod beam;
pub mod logits;
pub mod validate;

pub use beam::BeamState;

use crate::cancel::CancellationToken;
use crate::config::DecoderParams;
use crate::model::{EncoderDecoderModel, EncoderState, ModelError};
use crate::vocab::{Tokenizer, VocabularyTrie, EOS_IDX, PAD_IDX, SOS_IDX, UNK_IDX};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A finished hypothesis with its surface form and length-normalized
/// confidence, ready for dictionary lookup and ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWord {
    pub word: String,
    pub confidence: f32,
    pub score: f32,
}

/// Beam search over an encoder-decoder model.
///
/// The encoder state is computed once per gesture and shared read-only by
/// every beam; each decoding step builds a fresh generation of [`BeamState`]
/// values and drops the previous one wholesale, so there is no parent/child
/// pointer graph to manage.
pub struct BeamSearch<'a> {
    model: &'a dyn EncoderDecoderModel,
    params: &'a DecoderParams,
    trie: Option<&'a VocabularyTrie>,
    tokenizer: Tokenizer,
}

impl<'a> BeamSearch<'a> {
    pub fn new(model: &'a dyn EncoderDecoderModel, params: &'a DecoderParams) -> Self {
        Self {
            model,
            params,
            trie: None,
            tokenizer: Tokenizer::new(),
        }
    }

    /// Constrain decoding to dictionary words: letters that lead out of the
    /// trie and premature end-of-word are masked before the softmax.
    pub fn with_trie(mut self, trie: &'a VocabularyTrie) -> Self {
        self.trie = Some(trie);
        self
    }

    /// Run the search. Returns at most `beam_width` beams sorted by score
    /// descending; an empty Vec means "no prediction" and is not an error.
    ///
    /// Cancellation and the optional wall-clock deadline are both checked
    /// between steps only, so every returned beam is fully formed.
    pub fn decode(&self, state: &EncoderState, cancel: &CancellationToken) -> Vec<BeamState> {
        let beam_width = self.params.beam_width.max(1);
        let max_steps = self.params.max_decode_length.max(1);
        let deadline = (self.params.decode_timeout_ms > 0)
            .then(|| Instant::now() + Duration::from_millis(self.params.decode_timeout_ms));

        let mut beams = vec![BeamState::root()];

        for step in 0..max_steps {
            if cancel.is_cancelled() {
                debug!(step, "decode cancelled");
                return Vec::new();
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    warn!(step, "decode deadline hit, returning current beams");
                    break;
                }
            }

            let (finished, active): (Vec<BeamState>, Vec<BeamState>) =
                beams.into_iter().partition(|b| b.finished);

            if active.is_empty() {
                beams = finished;
                break;
            }

            // Each active beam expands independently against the shared
            // read-only encoder state. A model failure on one beam drops
            // that beam alone.
            let expansions: Vec<Vec<BeamState>> = if self.params.parallel_beams {
                active
                    .par_iter()
                    .map(|b| self.expand(state, b, beam_width, step))
                    .collect()
            } else {
                active
                    .iter()
                    .map(|b| self.expand(state, b, beam_width, step))
                    .collect()
            };

            let mut candidates = finished;
            for children in expansions {
                candidates.extend(children);
            }

            if candidates.is_empty() {
                warn!(step, "beam set exhausted, no prediction");
                return Vec::new();
            }

            beams = beam::prune(candidates, beam_width);

            if beams.iter().all(|b| b.finished) {
                break;
            }
        }

        beams
    }

    /// Expand one beam by its top `beam_width` tokens. Model errors are
    /// absorbed here: the beam contributes no children and the search
    /// continues with whatever survives.
    fn expand(
        &self,
        state: &EncoderState,
        beam: &BeamState,
        beam_width: usize,
        step: usize,
    ) -> Vec<BeamState> {
        let mut logits = match self.model.decode_step(state, &beam.tokens) {
            Ok(logits) => logits,
            Err(err) => {
                warn!(step, %err, "dropping beam after model failure");
                return Vec::new();
            }
        };

        self.mask(beam, &mut logits);

        if !logits.iter().any(|l| l.is_finite()) {
            // Trie dead end: nothing legal can extend this beam.
            return Vec::new();
        }

        let log_probs = logits::log_softmax(&logits);
        let top = logits::top_k(&log_probs, beam_width);

        let mut children = Vec::with_capacity(top.len());
        for idx in top {
            let token = idx as u32;
            // Masking already forbids these; keep the guard in case a trie
            // is not installed.
            if token == SOS_IDX || token == PAD_IDX || token == UNK_IDX {
                continue;
            }
            let finished = token == EOS_IDX;
            children.push(beam.child(token, log_probs[idx], finished));
        }
        children
    }

    /// Force structurally illegal tokens out of the distribution before the
    /// softmax: SOS/PAD/UNK always, plus everything the vocabulary trie
    /// rules out for the beam's current prefix.
    fn mask(&self, beam: &BeamState, logits: &mut [f32]) {
        logits[SOS_IDX as usize] = f32::NEG_INFINITY;
        logits[PAD_IDX as usize] = f32::NEG_INFINITY;
        logits[UNK_IDX as usize] = f32::NEG_INFINITY;

        let Some(trie) = self.trie else {
            return;
        };

        let prefix = self.tokenizer.merge(&beam.tokens);
        let allowed = trie.allowed_next(&prefix);
        let is_word = trie.contains_word(&prefix);

        for (idx, logit) in logits.iter_mut().enumerate() {
            let token = idx as u32;
            if token == EOS_IDX {
                if !is_word {
                    *logit = f32::NEG_INFINITY;
                }
                continue;
            }
            if let Some(c) = self.tokenizer.token_to_char(token) {
                if !allowed.contains(&c) {
                    *logit = f32::NEG_INFINITY;
                }
            }
        }
    }

    /// Turn surviving beams into surface words with length-normalized
    /// confidences. Cumulative log-probabilities penalize long words even at
    /// equal per-step confidence, so the raw score is divided by
    /// `(5 + len)^alpha / 6^alpha` before converting to a probability;
    /// without this, short completions always look more confident than long
    /// ones.
    pub fn into_candidates(&self, beams: Vec<BeamState>) -> Vec<DecodedWord> {
        let alpha = self.params.length_penalty_alpha;
        let mut out = Vec::with_capacity(beams.len());

        for beam in beams {
            let word = self.tokenizer.merge(&beam.tokens);
            if word.is_empty() {
                continue;
            }
            if validate::is_degenerate(&word) {
                warn!(%word, "rejecting degenerate decode output");
                continue;
            }

            let len = word.chars().count() as f32;
            let norm = ((5.0 + len).powf(alpha)) / 6.0f32.powf(alpha);
            let confidence = (beam.score / norm).exp();

            if confidence < self.params.confidence_threshold {
                continue;
            }

            out.push(DecodedWord {
                word,
                confidence,
                score: beam.score,
            });
        }

        out
    }
}

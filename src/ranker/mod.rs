pub mod normalize;
pub mod types;

pub use types::{Candidate, RankedSuggestion, WordSource};

use crate::config::RankerParams;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// Blend weights: neural confidence carries most of the score, then word
// frequency, then language context.
const NN_WEIGHT: f32 = 0.6;
const FREQ_WEIGHT: f32 = 0.3;
const CONTEXT_WEIGHT: f32 = 0.1;

const WORST_FREQUENCY_RANK: f32 = 255.0;

/// Unified scoring and ranking for multi-dictionary suggestions.
///
/// Blends neural confidence, dictionary frequency and language context into
/// one score per candidate:
///
/// ```text
/// score = (0.6*nn + 0.3*rank_score + 0.1*lang_multiplier) * source_priority
/// ```
///
/// where `rank_score = 1 - frequency_rank/255` and `lang_multiplier` is
/// `language_context * secondary_penalty` for secondary-dictionary words and
/// 1.0 otherwise. Output lists are sorted by score descending, capped, and
/// never contain the same word twice (accent-folded, case-insensitive).
#[derive(Debug, Clone)]
pub struct SuggestionRanker {
    secondary_penalty: f32,
    primary_context: f32,
    secondary_context: f32,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self {
            secondary_penalty: 0.9,
            primary_context: 1.0,
            secondary_context: 0.5,
        }
    }
}

impl SuggestionRanker {
    /// Build from externally supplied parameters, clamping at the point of
    /// use: penalty and context weights live in `[0.1, 1.0]`.
    pub fn from_params(params: &RankerParams) -> Self {
        Self {
            secondary_penalty: params.secondary_penalty.clamp(0.1, 1.0),
            primary_context: params.primary_language_context.clamp(0.1, 1.0),
            secondary_context: params.secondary_language_context.clamp(0.1, 1.0),
        }
    }

    pub fn set_secondary_penalty(&mut self, penalty: f32) {
        self.secondary_penalty = penalty.clamp(0.1, 1.0);
    }

    /// Update language-context confidence from detection, e.g. after the
    /// user commits a few words in the secondary language.
    pub fn set_language_context(&mut self, primary: f32, secondary: f32) {
        self.primary_context = primary.clamp(0.1, 1.0);
        self.secondary_context = secondary.clamp(0.1, 1.0);
    }

    fn score_with(&self, candidate: &Candidate, context: f32, penalty: f32) -> f32 {
        let rank_score = 1.0 - (candidate.frequency_rank as f32 / WORST_FREQUENCY_RANK);

        let lang_multiplier = match candidate.source {
            WordSource::Secondary => context * penalty,
            _ => 1.0,
        };

        let base = candidate.nn_confidence * NN_WEIGHT
            + rank_score * FREQ_WEIGHT
            + lang_multiplier * CONTEXT_WEIGHT;

        base * candidate.source.priority()
    }

    /// Score one candidate under the ranker's current language context.
    pub fn score(&self, candidate: &Candidate) -> f32 {
        match candidate.source {
            WordSource::Secondary => {
                self.score_with(candidate, self.secondary_context, self.secondary_penalty)
            }
            _ => self.score_with(candidate, self.primary_context, 1.0),
        }
    }

    /// Rank candidates from a single dictionary: at most `max_results`
    /// entries, sorted by score descending, no duplicate words.
    pub fn rank(&self, candidates: &[Candidate], max_results: usize) -> Vec<RankedSuggestion> {
        let scored = candidates
            .iter()
            .map(|c| self.to_suggestion(c, self.score(c)))
            .collect();
        Self::sort_dedup_cap(scored, max_results)
    }

    /// Merge candidates from the primary and secondary dictionaries into a
    /// single ranked list. A word present in both keeps only its
    /// higher-scoring entry's source and language metadata.
    pub fn rank_and_merge(
        &self,
        primary: &[Candidate],
        secondary: &[Candidate],
        max_results: usize,
    ) -> Vec<RankedSuggestion> {
        let mut scored: Vec<(String, RankedSuggestion)> = Vec::with_capacity(
            primary.len() + secondary.len(),
        );

        for c in primary {
            let s = self.score_with(c, self.primary_context, 1.0);
            scored.push((c.normalized.clone(), self.to_suggestion(c, s)));
        }
        for c in secondary {
            let s = self.score_with(c, self.secondary_context, self.secondary_penalty);
            scored.push((c.normalized.clone(), self.to_suggestion(c, s)));
        }

        let mut best: HashMap<String, RankedSuggestion> = HashMap::with_capacity(scored.len());
        for (key, suggestion) in scored {
            match best.get(&key) {
                Some(existing) if existing.score >= suggestion.score => {}
                _ => {
                    best.insert(key, suggestion);
                }
            }
        }

        debug!(merged = best.len(), "rank_and_merge deduplicated");

        let mut merged: Vec<RankedSuggestion> = best.into_values().collect();
        merged.sort_unstable_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.word.cmp(&b.word))
        });
        merged.truncate(max_results);
        merged
    }

    /// Boost candidates whose length is close to what the user already
    /// typed: confidence scales with `prefix_len / word_len`, so near-exact
    /// matches beat long completions conjured from a short prefix. All other
    /// candidate fields pass through untouched.
    pub fn apply_prefix_boost(&self, candidates: &[Candidate], typed_prefix: &str) -> Vec<Candidate> {
        let prefix_len = normalize::fold_accents(typed_prefix).chars().count() as f32;

        candidates
            .iter()
            .map(|c| {
                let word_len = c.normalized.chars().count() as f32;
                let completion_ratio = if word_len > 0.0 {
                    (prefix_len / word_len).min(1.0)
                } else {
                    0.0
                };
                let boosted = c.nn_confidence * (0.7 + 0.3 * completion_ratio);
                Candidate {
                    nn_confidence: boosted,
                    ..c.clone()
                }
            })
            .collect()
    }

    fn to_suggestion(&self, c: &Candidate, score: f32) -> RankedSuggestion {
        RankedSuggestion {
            word: c.word.clone(),
            score,
            source: c.source,
            language_code: c.language_code.clone(),
        }
    }

    fn sort_dedup_cap(
        scored: Vec<RankedSuggestion>,
        max_results: usize,
    ) -> Vec<RankedSuggestion> {
        let mut sorted = scored;
        sorted.sort_unstable_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.word.cmp(&b.word))
        });

        let mut seen: HashSet<String> = HashSet::with_capacity(sorted.len());
        let mut out = Vec::with_capacity(max_results.min(sorted.len()));
        for s in sorted {
            if out.len() >= max_results {
                break;
            }
            if seen.insert(normalize::fold_accents(&s.word)) {
                out.push(s);
            }
        }
        out
    }
}

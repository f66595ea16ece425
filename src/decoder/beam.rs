use crate::vocab::{TokenId, SOS_IDX};
use std::collections::HashSet;

/// One partial decoding hypothesis. A beam owns its token sequence; the
/// encoder state is shared by reference and never lives inside the beam.
///
/// `score` is the cumulative log-probability of the sequence. Each appended
/// token contributes a log-probability <= 0, so the score never increases as
/// the sequence grows.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamState {
    pub tokens: Vec<TokenId>,
    pub score: f32,
    pub finished: bool,
}

impl BeamState {
    /// The initial hypothesis: a lone start token with score 0.
    pub fn root() -> Self {
        Self {
            tokens: vec![SOS_IDX],
            score: 0.0,
            finished: false,
        }
    }

    /// Extend this beam by one token. `log_prob` must come from a
    /// log-softmax, never a raw logit.
    pub fn child(&self, token: TokenId, log_prob: f32, finished: bool) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(token);
        Self {
            tokens,
            score: self.score + log_prob,
            finished,
        }
    }
}

/// Keep the top `beam_width` hypotheses of a fresh generation, sorted by
/// score descending. Exactly equal scores rank the shorter sequence first
/// (deterministic tie-break). Distinct parents can converge on the same
/// token sequence, so identical sequences are collapsed to their best copy.
///
/// The surviving generation is a brand new Vec; the previous one is dropped
/// wholesale by the caller, which is all the garbage collection beam search
/// needs.
pub fn prune(mut candidates: Vec<BeamState>, beam_width: usize) -> Vec<BeamState> {
    candidates.sort_unstable_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.tokens.len().cmp(&b.tokens.len()))
    });

    let mut seen: HashSet<Vec<TokenId>> = HashSet::with_capacity(beam_width);
    let mut kept = Vec::with_capacity(beam_width.min(candidates.len()));
    for c in candidates {
        if kept.len() >= beam_width {
            break;
        }
        if seen.insert(c.tokens.clone()) {
            kept.push(c);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam(tokens: &[TokenId], score: f32) -> BeamState {
        BeamState {
            tokens: tokens.to_vec(),
            score,
            finished: false,
        }
    }

    #[test]
    fn prune_sorts_descending_and_truncates() {
        let out = prune(
            vec![beam(&[2, 4], -2.0), beam(&[2, 5], -1.0), beam(&[2, 6], -3.0)],
            2,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].score, -1.0);
        assert_eq!(out[1].score, -2.0);
    }

    #[test]
    fn equal_scores_prefer_shorter() {
        let out = prune(vec![beam(&[2, 4, 5], -1.0), beam(&[2, 4], -1.0)], 2);
        assert_eq!(out[0].tokens.len(), 2);
    }

    #[test]
    fn identical_sequences_collapse() {
        let out = prune(vec![beam(&[2, 4], -1.5), beam(&[2, 4], -1.0)], 4);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, -1.0);
    }
}

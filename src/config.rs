use crate::error::GtResult;
use crate::resampler::ResamplingMode;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All externally supplied tuning knobs, grouped by pipeline stage. The
/// core consumes these but does not own them: values are validated or
/// clamped at the point of use, never here.
#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineParams {
    #[command(flatten)]
    pub classifier: ClassifierParams,
    #[command(flatten)]
    pub decoder: DecoderParams,
    #[command(flatten)]
    pub ranker: RankerParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Gestures at least this long (ms) count as deliberate swipes.
    #[arg(long, default_value_t = 150)]
    pub tap_duration_threshold_ms: i64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            tap_duration_threshold_ms: 150,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderParams {
    #[arg(long, default_value_t = 8)]
    pub beam_width: usize,

    /// Hard ceiling on decoding steps, independent of wall-clock time.
    #[arg(long, default_value_t = 20)]
    pub max_decode_length: usize,

    /// Candidates below this length-normalized confidence are dropped.
    #[arg(long, default_value_t = 0.01)]
    pub confidence_threshold: f32,

    /// Length normalization exponent (1.0 = linear).
    #[arg(long, default_value_t = 1.0)]
    pub length_penalty_alpha: f32,

    #[arg(long, value_enum, default_value_t = ResamplingMode::Merge)]
    pub resampling_mode: ResamplingMode,

    /// Expand beams on the rayon pool instead of sequentially.
    #[arg(long, default_value_t = false)]
    pub parallel_beams: bool,

    /// Wall-clock guard against pathologically slow model calls, checked
    /// between beam steps. 0 disables the guard.
    #[arg(long, default_value_t = 0)]
    pub decode_timeout_ms: u64,
}

impl Default for DecoderParams {
    fn default() -> Self {
        Self {
            beam_width: 8,
            max_decode_length: 20,
            confidence_threshold: 0.01,
            length_penalty_alpha: 1.0,
            resampling_mode: ResamplingMode::Merge,
            parallel_beams: false,
            decode_timeout_ms: 0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerParams {
    #[arg(long, default_value_t = 5)]
    pub max_results: usize,

    /// Score multiplier for secondary-dictionary words, clamped to
    /// [0.1, 1.0] when applied.
    #[arg(long, default_value_t = 0.9)]
    pub secondary_penalty: f32,

    /// Confidence the user is typing the primary language, clamped to
    /// [0.1, 1.0] when applied.
    #[arg(long, default_value_t = 1.0)]
    pub primary_language_context: f32,

    /// Confidence the user is typing the secondary language, clamped to
    /// [0.1, 1.0] when applied.
    #[arg(long, default_value_t = 0.5)]
    pub secondary_language_context: f32,

    /// Keep decoded words missing from every dictionary (they rank at the
    /// worst frequency). Off by default: unknown beam output is usually
    /// noise.
    #[arg(long, default_value_t = false)]
    pub keep_out_of_vocabulary: bool,
}

impl Default for RankerParams {
    fn default() -> Self {
        Self {
            max_results: 5,
            secondary_penalty: 0.9,
            primary_language_context: 1.0,
            secondary_language_context: 0.5,
            keep_out_of_vocabulary: false,
        }
    }
}

impl EngineParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GtResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let params = EngineParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: EngineParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.decoder.beam_width, params.decoder.beam_width);
        assert_eq!(back.ranker.max_results, params.ranker.max_results);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let back: EngineParams =
            serde_json::from_str(r#"{"decoder": {"beam_width": 3}}"#).unwrap();
        assert_eq!(back.decoder.beam_width, 3);
        assert_eq!(back.decoder.max_decode_length, 20);
        assert_eq!(back.classifier.tap_duration_threshold_ms, 150);
    }
}

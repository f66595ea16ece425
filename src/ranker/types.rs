use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Where a candidate word came from. Higher-priority sources outrank lower
/// ones at equal confidence and frequency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WordSource {
    /// User-added custom words.
    Custom,
    /// The user dictionary.
    User,
    /// The primary language dictionary.
    Main,
    /// A secondary language dictionary.
    Secondary,
}

impl WordSource {
    /// Score multiplier: Custom > User > Main > Secondary.
    pub fn priority(self) -> f32 {
        match self {
            WordSource::Custom => 1.2,
            WordSource::User => 1.1,
            WordSource::Main => 1.0,
            WordSource::Secondary => 0.9,
        }
    }
}

/// A word hypothesis with its scoring inputs, constructed once per
/// decode/rank cycle and never mutated afterwards. `normalized` is the
/// accent-folded lookup/dedup key.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub word: String,
    pub normalized: String,
    /// 0..=255, lower = more common.
    pub frequency_rank: i32,
    pub source: WordSource,
    /// Neural confidence in 0..=1.
    pub nn_confidence: f32,
    pub language_code: String,
}

impl Candidate {
    pub fn new(
        word: impl Into<String>,
        frequency_rank: i32,
        source: WordSource,
        nn_confidence: f32,
        language_code: impl Into<String>,
    ) -> Self {
        let word = word.into();
        let normalized = super::normalize::fold_accents(&word);
        Self {
            word,
            normalized,
            frequency_rank,
            source,
            nn_confidence,
            language_code: language_code.into(),
        }
    }
}

/// Final ranked output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSuggestion {
    pub word: String,
    pub score: f32,
    pub source: WordSource,
    pub language_code: String,
}

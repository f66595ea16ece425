use crate::error::GtResult;
use crate::ranker::normalize::fold_accents;
use crate::ranker::WordSource;
use crate::vocab::VocabularyTrie;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Frequency rank assigned to words no dictionary knows.
pub const WORST_RANK: i32 = 255;

/// Dictionary metadata for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    /// Canonical display form (may carry accents the decoder cannot emit).
    pub word: String,
    /// 0..=255, lower = more common.
    pub frequency_rank: i32,
    pub source: WordSource,
    pub language_code: String,
}

/// External dictionary/personalization collaborator. The pipeline only ever
/// talks to this trait; where the words come from (asset files, user
/// dictionary, sync) is someone else's problem.
pub trait CandidateSource {
    /// Look up a decoded surface word (accent-folded key).
    fn lookup(&self, word: &str) -> Option<DictionaryEntry>;

    /// Per-word personalization multiplier, applied to neural confidence
    /// before ranking. 1.0 = no adjustment.
    fn personalization_boost(&self, _word: &str) -> f32 {
        1.0
    }
}

#[derive(Debug, Deserialize)]
struct LexiconRecord {
    word: String,
    frequency: u64,
}

/// In-memory word list with frequency ranks, the reference
/// [`CandidateSource`]. Also exports a [`VocabularyTrie`] so the decoder can
/// constrain beams to words this lexicon contains.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, DictionaryEntry>,
    boosts: HashMap<String, f32>,
}

impl Lexicon {
    /// Build from `(word, rank)` pairs; ranks are clamped to 0..=255.
    pub fn from_ranked<I, S>(words: I, source: WordSource, language_code: &str) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let mut entries = HashMap::new();
        for (word, rank) in words {
            let word = word.into();
            entries.insert(
                fold_accents(&word),
                DictionaryEntry {
                    word,
                    frequency_rank: rank.clamp(0, WORST_RANK),
                    source,
                    language_code: language_code.to_string(),
                },
            );
        }
        Self {
            entries,
            boosts: HashMap::new(),
        }
    }

    /// Load a `word,frequency` CSV (headered). Raw corpus frequencies are
    /// converted to dense ranks by descending frequency, capped at 255.
    pub fn load_from_csv<P: AsRef<Path>>(
        path: P,
        source: WordSource,
        language_code: &str,
    ) -> GtResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let mut records: Vec<LexiconRecord> = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        records.sort_unstable_by(|a, b| b.frequency.cmp(&a.frequency));

        let lexicon = Self::from_ranked(
            records
                .into_iter()
                .enumerate()
                .map(|(i, r)| (r.word, (i as i32).min(WORST_RANK))),
            source,
            language_code,
        );

        info!(
            path = %path.as_ref().display(),
            words = lexicon.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    /// Small embedded English list so the CLI demo works without assets.
    pub fn builtin_demo() -> Self {
        const DEMO: &[(&str, i32)] = &[
            ("the", 0),
            ("and", 1),
            ("you", 2),
            ("that", 3),
            ("this", 5),
            ("hello", 8),
            ("world", 12),
            ("have", 13),
            ("with", 14),
            ("help", 20),
            ("here", 22),
            ("there", 24),
            ("hell", 60),
            ("hero", 70),
            ("herd", 120),
            ("yellow", 90),
            ("jello", 200),
            ("word", 40),
            ("would", 18),
            ("about", 26),
            ("people", 30),
            ("time", 33),
            ("good", 35),
            ("great", 45),
            ("think", 48),
        ];
        Self::from_ranked(DEMO.iter().map(|&(w, r)| (w, r)), WordSource::Main, "en")
    }

    /// Record a personalization multiplier for a word (e.g. from usage
    /// statistics). Clamped to a sane band so a runaway counter cannot
    /// dominate the neural signal.
    pub fn set_personalization_boost(&mut self, word: &str, boost: f32) {
        self.boosts
            .insert(fold_accents(word), boost.clamp(0.5, 2.0));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.word.as_str())
    }

    /// Trie over the folded word forms, for trie-guided decoding.
    pub fn trie(&self) -> VocabularyTrie {
        let mut trie = VocabularyTrie::new();
        trie.insert_all(self.entries.keys().map(String::as_str));
        trie
    }
}

impl CandidateSource for Lexicon {
    fn lookup(&self, word: &str) -> Option<DictionaryEntry> {
        self.entries.get(&fold_accents(word)).cloned()
    }

    fn personalization_boost(&self, word: &str) -> f32 {
        self.boosts.get(&fold_accents(word)).copied().unwrap_or(1.0)
    }
}

use std::collections::HashSet;

pub type TokenId = u32;

// Special tokens, fixed by the model export contract.
pub const PAD_IDX: TokenId = 0;
pub const UNK_IDX: TokenId = 1;
pub const SOS_IDX: TokenId = 2;
pub const EOS_IDX: TokenId = 3;

/// Letter alphabet the decoder emits: a-z plus apostrophe, mapped to token
/// ids 4..=30.
const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '\'',
];

const FIRST_CHAR_IDX: TokenId = 4;

/// Total vocabulary size: 4 specials + alphabet.
pub const VOCAB_SIZE: usize = 4 + ALPHABET.len();

/// Bidirectional mapping between surface characters and model token ids.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn vocab_size(&self) -> usize {
        VOCAB_SIZE
    }

    pub fn char_to_token(&self, c: char) -> Option<TokenId> {
        let lower = c.to_ascii_lowercase();
        ALPHABET
            .iter()
            .position(|&a| a == lower)
            .map(|i| FIRST_CHAR_IDX + i as TokenId)
    }

    pub fn token_to_char(&self, token: TokenId) -> Option<char> {
        let idx = token.checked_sub(FIRST_CHAR_IDX)? as usize;
        ALPHABET.get(idx).copied()
    }

    /// Merge a token sequence into its surface word, dropping specials and
    /// anything outside the alphabet.
    pub fn merge(&self, tokens: &[TokenId]) -> String {
        tokens
            .iter()
            .filter_map(|&t| self.token_to_char(t))
            .collect()
    }

    /// Tokenize a word as the decoder would emit it: SOS, letters, EOS.
    /// Characters outside the alphabet become UNK.
    pub fn encode_word(&self, word: &str) -> Vec<TokenId> {
        let mut tokens = Vec::with_capacity(word.len() + 2);
        tokens.push(SOS_IDX);
        for c in word.chars() {
            tokens.push(self.char_to_token(c).unwrap_or(UNK_IDX));
        }
        tokens.push(EOS_IDX);
        tokens
    }
}

const TRIE_NONE: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct TrieNode {
    children: [u32; ALPHABET.len()],
    is_word: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: [TRIE_NONE; ALPHABET.len()],
            is_word: false,
        }
    }
}

/// Prefix trie over the decoding alphabet, used to constrain beam search to
/// dictionary words (logit masking). Arena-backed: nodes live in one Vec and
/// children are indices, so pruning a beam generation never touches the trie.
#[derive(Debug, Clone)]
pub struct VocabularyTrie {
    nodes: Vec<TrieNode>,
    word_count: usize,
}

impl Default for VocabularyTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularyTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            word_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    fn char_slot(c: char) -> Option<usize> {
        let lower = c.to_ascii_lowercase();
        ALPHABET.iter().position(|&a| a == lower)
    }

    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut node = 0usize;
        for c in word.chars() {
            let Some(slot) = Self::char_slot(c) else {
                // Word contains characters the decoder can never emit.
                return;
            };
            let next = self.nodes[node].children[slot];
            node = if next == TRIE_NONE {
                let idx = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node].children[slot] = idx as u32;
                idx
            } else {
                next as usize
            };
        }
        if !self.nodes[node].is_word {
            self.nodes[node].is_word = true;
            self.word_count += 1;
        }
    }

    pub fn insert_all<'a, I: IntoIterator<Item = &'a str>>(&mut self, words: I) {
        for w in words {
            self.insert(w);
        }
    }

    fn walk(&self, prefix: &str) -> Option<usize> {
        let mut node = 0usize;
        for c in prefix.chars() {
            let slot = Self::char_slot(c)?;
            let next = self.nodes[node].children[slot];
            if next == TRIE_NONE {
                return None;
            }
            node = next as usize;
        }
        Some(node)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|n| self.nodes[n].is_word)
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    /// Characters that extend `prefix` toward at least one dictionary word.
    /// An unreachable prefix allows nothing.
    pub fn allowed_next(&self, prefix: &str) -> HashSet<char> {
        let Some(node) = self.walk(prefix) else {
            return HashSet::new();
        };
        self.nodes[node]
            .children
            .iter()
            .enumerate()
            .filter(|(_, &child)| child != TRIE_NONE)
            .map(|(slot, _)| ALPHABET[slot])
            .collect()
    }
}

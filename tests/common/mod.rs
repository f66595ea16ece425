#![allow(dead_code)] // Not every test file uses every helper.

use glidetype::input::{Point, ResampledTrajectory, SwipeInput};
use glidetype::keyboard::KeyboardLayout;
use glidetype::model::{EncoderDecoderModel, EncoderState, ModelError};
use glidetype::vocab::{TokenId, Tokenizer, EOS_IDX, SOS_IDX, VOCAB_SIZE};
use std::collections::{HashMap, HashSet};

pub const BASE_LOGIT: f32 = -8.0;

pub fn tok(c: char) -> TokenId {
    Tokenizer::new().char_to_token(c).unwrap()
}

/// SOS-prefixed token sequence for a partial word, as a beam would hold it.
pub fn prefix(word: &str) -> Vec<TokenId> {
    let mut tokens = vec![SOS_IDX];
    tokens.extend(word.chars().map(tok));
    tokens
}

/// Flat low logits with chosen peaks. `'$'` peaks EOS.
pub fn peaked(peaks: &[(char, f32)]) -> Vec<f32> {
    let mut logits = vec![BASE_LOGIT; VOCAB_SIZE];
    for &(c, value) in peaks {
        let idx = if c == '$' {
            EOS_IDX as usize
        } else {
            tok(c) as usize
        };
        logits[idx] = value;
    }
    logits
}

/// Scriptable test double standing in for a real decoder session: returns
/// pre-programmed logits per token prefix, with optional failure injection
/// per prefix or on encode.
pub struct ScriptedModel {
    input_len: usize,
    script: HashMap<Vec<TokenId>, Vec<f32>>,
    fallback: Vec<f32>,
    fail_on: HashSet<Vec<TokenId>>,
    fail_encode: bool,
    fail_all_steps: bool,
}

impl ScriptedModel {
    pub fn new(input_len: usize) -> Self {
        Self {
            input_len,
            script: HashMap::new(),
            fallback: vec![BASE_LOGIT; VOCAB_SIZE],
            fail_on: HashSet::new(),
            fail_encode: false,
            fail_all_steps: false,
        }
    }

    /// Script the logits returned after the given emitted word prefix.
    pub fn on(mut self, word_prefix: &str, logits: Vec<f32>) -> Self {
        self.script.insert(prefix(word_prefix), logits);
        self
    }

    /// Make `decode_step` fail for one specific prefix.
    pub fn failing_on(mut self, word_prefix: &str) -> Self {
        self.fail_on.insert(prefix(word_prefix));
        self
    }

    pub fn failing_encode(mut self) -> Self {
        self.fail_encode = true;
        self
    }

    pub fn failing_all_steps(mut self) -> Self {
        self.fail_all_steps = true;
        self
    }

    /// Logits returned for unscripted prefixes (default: flat).
    pub fn fallback(mut self, logits: Vec<f32>) -> Self {
        self.fallback = logits;
        self
    }
}

impl EncoderDecoderModel for ScriptedModel {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn vocab_size(&self) -> usize {
        VOCAB_SIZE
    }

    fn encode(&self, trajectory: &ResampledTrajectory) -> Result<EncoderState, ModelError> {
        if self.fail_encode {
            return Err(ModelError::Inference("scripted encode failure".into()));
        }
        let mut memory = Vec::with_capacity(trajectory.len() * 2);
        for p in trajectory.points() {
            memory.push(p.x);
            memory.push(p.y);
        }
        Ok(EncoderState::new(memory, trajectory.len(), 2))
    }

    fn decode_step(
        &self,
        _state: &EncoderState,
        tokens: &[TokenId],
    ) -> Result<Vec<f32>, ModelError> {
        if self.fail_all_steps || self.fail_on.contains(tokens) {
            return Err(ModelError::Inference("scripted step failure".into()));
        }
        Ok(self
            .script
            .get(tokens)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Straight-line trace between two points with evenly spaced timestamps.
pub fn line_trace(from: Point, to: Point, points: usize, total_ms: i64) -> SwipeInput {
    let n = points.max(2);
    let coordinates: Vec<Point> = (0..n)
        .map(|i| {
            let t = i as f32 / (n - 1) as f32;
            Point::new(from.x + t * (to.x - from.x), from.y + t * (to.y - from.y))
        })
        .collect();
    let timestamps: Vec<i64> = (0..n)
        .map(|i| total_ms * i as i64 / (n - 1) as i64)
        .collect();
    SwipeInput::new(coordinates, timestamps)
}

/// Deterministic (jitter-free) trace along a word's key centers.
pub fn word_trace(keyboard: &KeyboardLayout, word: &str, points_per_segment: usize) -> SwipeInput {
    let anchors = keyboard.word_path(word);
    assert!(anchors.len() >= 2, "word '{word}' needs at least 2 keys");

    let steps = points_per_segment.max(2);
    let mut coordinates = Vec::new();
    for pair in anchors.windows(2) {
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            coordinates.push(Point::new(
                pair[0].x + t * (pair[1].x - pair[0].x),
                pair[0].y + t * (pair[1].y - pair[0].y),
            ));
        }
    }
    coordinates.push(*anchors.last().unwrap());

    let timestamps: Vec<i64> = (0..coordinates.len()).map(|i| i as i64 * 8).collect();
    SwipeInput::new(coordinates, timestamps)
}

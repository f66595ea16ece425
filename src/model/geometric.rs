use crate::input::{Point, ResampledTrajectory};
use crate::keyboard::KeyboardLayout;
use crate::model::{EncoderDecoderModel, EncoderState, ModelError};
use crate::vocab::{TokenId, Tokenizer, EOS_IDX, VOCAB_SIZE};

/// Logit assigned to tokens the backend can never emit (specials, letters
/// with no physical key). Finite so log-softmax stays well-defined.
const FORBIDDEN_LOGIT: f32 = -1.0e9;

/// Deterministic reference backend that scores letters purely from keyboard
/// geometry: the emitted prefix is aligned monotonically against the swipe
/// path, and each candidate next letter is scored by the squared distance
/// from the remaining path to that letter's key center. EOS is scored like a
/// virtual key sitting at the end of the path.
///
/// This is what the pipeline runs when no trained model is wired in: the CLI
/// demo and the end-to-end tests use it. It carries no learned transition
/// statistics, so every prediction is reproducible from the geometry alone.
pub struct GeometricModel {
    keyboard: KeyboardLayout,
    tokenizer: Tokenizer,
    input_len: usize,
    sharpness: f32,
}

impl GeometricModel {
    pub const DEFAULT_INPUT_LEN: usize = 64;
    pub const DEFAULT_SHARPNESS: f32 = 4.0;

    pub fn new(keyboard: KeyboardLayout, input_len: usize) -> Self {
        Self {
            keyboard,
            tokenizer: Tokenizer::new(),
            input_len,
            sharpness: Self::DEFAULT_SHARPNESS,
        }
    }

    /// `sharpness` scales how steeply probability falls off with distance
    /// from the path; higher values make the backend more opinionated.
    pub fn with_sharpness(mut self, sharpness: f32) -> Self {
        self.sharpness = sharpness;
        self
    }

    fn path(state: &EncoderState) -> Vec<Point> {
        (0..state.frames)
            .map(|i| {
                let f = state.frame(i);
                Point::new(f[0], f[1])
            })
            .collect()
    }

    /// Best monotone alignment of one key against `path[from..]`.
    fn best_match(path: &[Point], from: usize, key: Point) -> (usize, f32) {
        let mut best_idx = from;
        let mut best_dist = f32::MAX;
        for (offset, p) in path[from..].iter().enumerate() {
            let d = p.distance(&key);
            if d < best_dist {
                best_dist = d;
                best_idx = from + offset;
            }
        }
        (best_idx, best_dist)
    }

    /// Align the emitted prefix against the path, returning the path index
    /// the next letter should be scored from. Letters advance the cursor
    /// monotonically; a repeated letter may re-match the same position.
    fn align_prefix(&self, path: &[Point], tokens: &[TokenId]) -> usize {
        let mut cursor = 0usize;
        for &token in tokens {
            let Some(c) = self.tokenizer.token_to_char(token) else {
                continue;
            };
            let Some(key) = self.keyboard.key_center(c) else {
                continue;
            };
            let (idx, _) = Self::best_match(path, cursor, key);
            cursor = idx;
        }
        cursor
    }
}

impl EncoderDecoderModel for GeometricModel {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn vocab_size(&self) -> usize {
        VOCAB_SIZE
    }

    fn encode(&self, trajectory: &ResampledTrajectory) -> Result<EncoderState, ModelError> {
        if trajectory.len() != self.input_len {
            return Err(ModelError::Inference(format!(
                "expected {} trajectory points, got {}",
                self.input_len,
                trajectory.len()
            )));
        }

        let mut memory = Vec::with_capacity(trajectory.len() * 2);
        for p in trajectory.points() {
            memory.push(p.x);
            memory.push(p.y);
        }
        Ok(EncoderState::new(memory, trajectory.len(), 2))
    }

    fn decode_step(&self, state: &EncoderState, tokens: &[TokenId]) -> Result<Vec<f32>, ModelError> {
        if state.frames == 0 {
            return Err(ModelError::Inference("empty encoder state".to_string()));
        }

        let path = Self::path(state);
        let cursor = self.align_prefix(&path, tokens);
        let key_width = self.keyboard.key_width.max(1.0);

        let mut logits = vec![FORBIDDEN_LOGIT; VOCAB_SIZE];

        for token in 0..VOCAB_SIZE as TokenId {
            let Some(c) = self.tokenizer.token_to_char(token) else {
                continue;
            };
            let Some(key) = self.keyboard.key_center(c) else {
                continue;
            };
            let (_, dist) = Self::best_match(&path, cursor, key);
            let normalized = dist / key_width;
            logits[token as usize] = -self.sharpness * normalized * normalized;
        }

        // EOS behaves like a key at the path's endpoint: finishing is
        // attractive exactly when the prefix has consumed the whole path.
        let end = path[path.len() - 1];
        let remaining = path[cursor].distance(&end) / key_width;
        logits[EOS_IDX as usize] = -self.sharpness * remaining * remaining;

        Ok(logits)
    }
}

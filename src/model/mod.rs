pub mod geometric;

pub use geometric::GeometricModel;

use crate::input::ResampledTrajectory;
use crate::vocab::TokenId;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone)]
pub enum ModelError {
    #[error("model is not initialized")]
    Uninitialized,

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Encoder output for one gesture: the one piece of cross-beam shared,
/// read-only data. Beams receive it by reference and must never mutate it;
/// it is produced once per decode and dropped when the decode ends.
///
/// `memory` is a row-major `frames` x `dims` buffer; its interpretation is
/// private to the backend that produced it.
#[derive(Debug, Clone)]
pub struct EncoderState {
    pub memory: Vec<f32>,
    pub frames: usize,
    pub dims: usize,
}

impl EncoderState {
    pub fn new(memory: Vec<f32>, frames: usize, dims: usize) -> Self {
        debug_assert_eq!(memory.len(), frames * dims);
        Self {
            memory,
            frames,
            dims,
        }
    }

    #[inline]
    pub fn frame(&self, i: usize) -> &[f32] {
        &self.memory[i * self.dims..(i + 1) * self.dims]
    }
}

/// Capability interface over the on-device encoder-decoder model.
///
/// Backends (ONNX sessions, alternative runtimes, test doubles) hide behind
/// this one seam so beam search can be exercised without native model
/// libraries. Inference methods take `&self`: a backend must be stateless
/// for inference or synchronize internally, because beam expansion may call
/// `decode_step` from several threads against the same shared state.
pub trait EncoderDecoderModel: Send + Sync {
    /// The fixed trajectory length the encoder expects. A model property,
    /// not a pipeline constant.
    fn input_len(&self) -> usize;

    fn vocab_size(&self) -> usize;

    /// One-time warm-up. Called by [`ModelHandle::initialize`].
    fn initialize(&self) -> Result<(), ModelError> {
        Ok(())
    }

    /// Encode a fixed-length trajectory into the shared decoder memory.
    fn encode(&self, trajectory: &ResampledTrajectory) -> Result<EncoderState, ModelError>;

    /// Raw (pre-softmax) logits over the vocabulary for the next token,
    /// given the tokens emitted so far (starting with SOS).
    fn decode_step(&self, state: &EncoderState, tokens: &[TokenId]) -> Result<Vec<f32>, ModelError>;

    /// Release backend resources. Called by [`ModelHandle::cleanup`].
    fn cleanup(&self) {}
}

/// Explicitly owned model lifecycle. Construction runs the backend's
/// warm-up exactly once; dropping predictions between gestures never
/// re-initializes. There is deliberately no ambient singleton: whoever owns
/// the handle owns the model's lifetime.
pub struct ModelHandle {
    backend: Arc<dyn EncoderDecoderModel>,
}

impl ModelHandle {
    pub fn initialize(backend: Arc<dyn EncoderDecoderModel>) -> Result<Self, ModelError> {
        backend.initialize()?;
        info!(input_len = backend.input_len(), "model backend initialized");
        Ok(Self { backend })
    }

    pub fn backend(&self) -> &Arc<dyn EncoderDecoderModel> {
        &self.backend
    }

    /// Tear the backend down. Consumes the handle; other `Arc` holders keep
    /// the allocation alive but the session is gone.
    pub fn cleanup(self) {
        self.backend.cleanup();
        info!("model backend cleaned up");
    }
}

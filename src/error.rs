use crate::model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlideError {
    #[error("Insufficient trajectory: {0} point(s), need at least 2")]
    InsufficientPoints(usize),

    #[error("Model Error: {0}")]
    Model(#[from] ModelError),

    #[error("Beam set exhausted before any hypothesis finished")]
    DecodeExhausted,

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GtResult<T> = Result<T, GlideError>;

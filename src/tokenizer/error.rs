use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("tokenizer not found at path: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to load tokenizer: {reason}")]
    LoadFailed { reason: String },

    #[error("invalid tokenizer config at {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("encoding failed: {reason}")]
    EncodeFailed { reason: String },

    #[error("decoding failed: {reason}")]
    DecodeFailed { reason: String },
}

impl From<std::io::Error> for TokenizerError {
    fn from(err: std::io::Error) -> Self {
        TokenizerError::LoadFailed {
            reason: err.to_string(),
        }
    }
}

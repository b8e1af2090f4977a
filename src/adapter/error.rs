use thiserror::Error;

use crate::reconcile::TokenizationError;
use crate::remote::RemoteScoringError;
use crate::tokenizer::TokenizerError;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("tokenization failed for item {item}: {source}")]
    Tokenization {
        item: usize,
        #[source]
        source: TokenizationError,
    },

    #[error("remote scoring failed for item {item}: {source}")]
    RemoteScoring {
        item: usize,
        #[source]
        source: RemoteScoringError,
    },

    #[error("unsupported operation '{operation}': this adapter only scores prefixes")]
    UnsupportedOperation { operation: &'static str },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
}

impl AdapterError {
    /// Index of the batch item that failed, if the error is item-scoped.
    pub fn item(&self) -> Option<usize> {
        match self {
            AdapterError::Tokenization { item, .. } | AdapterError::RemoteScoring { item, .. } => {
                Some(*item)
            }
            _ => None,
        }
    }
}

use thiserror::Error;

use crate::tokenizer::TokenizerError;

#[derive(Debug, Error)]
pub enum TokenizationError {
    #[error("tokenization does not match (expected: {expected:?}, actual: {actual:?})")]
    Mismatch { expected: Vec<u32>, actual: Vec<u32> },

    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
}

//! Tokenizer seam.
//!
//! The adapter never builds vocabularies itself; it consumes a [`TextTokenizer`].
//! [`HfTokenizer`] wraps a HuggingFace `tokenizer.json`, and [`MockTokenizer`]
//! is a whitespace word-level vocabulary for tests.

pub mod error;
/// HuggingFace `tokenizers` backend.
pub mod hf;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Tokenizer file resolution helpers.
pub mod utils;


pub use error::TokenizerError;
pub use hf::{HfTokenizer, TokenizerMetadata};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTokenizer;

/// Tokenizer capabilities the adapter relies on.
///
/// `encode` must never add special tokens and `decode` must not skip them, so
/// that decode/encode round-trips can be compared position by position.
pub trait TextTokenizer: Send + Sync {
    /// Encodes `text` without BOS/EOS or other implicit markers.
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError>;

    /// Decodes `ids` back to text, keeping special tokens.
    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError>;

    /// Base vocabulary size (added tokens excluded).
    fn vocab_size(&self) -> usize;

    /// End-of-sequence token id, if the tokenizer defines one.
    fn eos_token_id(&self) -> Option<u32>;

    /// Raw `model_max_length`, which may be
    /// [`UNBOUNDED_MODEL_MAX_LENGTH`](crate::constants::UNBOUNDED_MODEL_MAX_LENGTH).
    fn model_max_length(&self) -> Option<u128>;
}

//! Harness-facing scoring adapter.
//!
//! [`TgiAdapter`] composes the [`Reconciler`](crate::reconcile::Reconciler)
//! and a [`ScoringClient`](crate::remote::ScoringClient) per batch item and
//! exposes the result through the [`ScoringAdapter`] capability trait.
//!
//! # Batch semantics
//!
//! - One remote request per item; responses come back in item order.
//! - Reconciliation runs for the whole batch before the first request. A
//!   mismatch on any item fails the batch with [`AdapterError::Tokenization`].
//! - Leading-token drift is logged per item and counted in
//!   [`BatchScores::minor_drift_count`].
//! - Generation is not supported and always fails.

pub mod config;
pub mod error;
pub mod tgi;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::AdapterConfig;
pub use error::AdapterError;
pub use tgi::TgiAdapter;
pub use types::{BatchItem, BatchScores, ModelCallOutput};

use async_trait::async_trait;

#[async_trait]
/// Capabilities an evaluation harness needs from a scoring backend.
pub trait ScoringAdapter: Send + Sync {
    /// Encodes text without special tokens.
    fn tok_encode(&self, text: &str) -> Result<Vec<u32>, AdapterError>;

    /// Decodes token ids to text.
    fn tok_decode(&self, ids: &[u32]) -> Result<String, AdapterError>;

    /// Scores each token sequence (with optional parallel source texts) and
    /// returns per-item log-probabilities and predicted ids.
    async fn model_call(
        &self,
        inputs: &[Vec<u32>],
        texts: Option<&[Option<String>]>,
    ) -> Result<ModelCallOutput, AdapterError>;

    /// Free-form generation. Scoring-only adapters return
    /// [`AdapterError::UnsupportedOperation`].
    fn model_generate(
        &self,
        context: &[u32],
        max_length: usize,
        eos_token_id: Option<u32>,
    ) -> Result<Vec<u32>, AdapterError>;

    fn vocab_size(&self) -> usize;

    /// End-of-text token id.
    fn eot_token_id(&self) -> Option<u32>;

    /// Maximum context length in tokens.
    fn max_length(&self) -> usize;

    fn max_gen_toks(&self) -> usize;

    fn batch_size(&self) -> usize;

    fn device(&self) -> &str;
}

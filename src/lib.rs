//! Remote prefix scoring for likelihood-based LM evaluation.
//!
//! The crate lets an evaluation harness score text with a model served by a
//! text-generation-inference endpoint. For each item it reconciles the
//! harness's token ids with a local tokenizer, submits the canonical text as a
//! one-token generation request with decoder input details, and returns the
//! per-token log-probabilities and predicted ids of the prefix.
//!
//! # Public API Surface
//!
//! ## Adapter
//! - [`TgiAdapter`], [`ScoringAdapter`], [`AdapterConfig`] - batch scoring and harness properties
//! - [`BatchItem`], [`BatchScores`] - batch input and output
//!
//! ## Building Blocks
//! - [`Reconciler`], [`AlignmentVerdict`] - tokenization drift detection
//! - [`ScoringClient`], [`TgiClient`], [`ScoringResponse`] - remote scoring
//! - [`TextTokenizer`], [`HfTokenizer`] - tokenizer seam
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`], [`BatchSize`] - `TGI_SCORER_*` environment settings
//!
//! ## Test/Mock Support
//! [`MockTokenizer`] and [`MockScoringClient`] are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod adapter;
pub mod config;
pub mod constants;
pub mod reconcile;
pub mod remote;
pub mod tokenizer;

pub use adapter::{
    AdapterConfig, AdapterError, BatchItem, BatchScores, ModelCallOutput, ScoringAdapter,
    TgiAdapter,
};
pub use config::{BatchSize, Config, ConfigError};
pub use constants::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_LENGTH, MAX_GEN_TOKS, UNBOUNDED_MODEL_MAX_LENGTH,
};
pub use reconcile::{AlignmentVerdict, Reconciled, Reconciler, TokenizationError};
#[cfg(any(test, feature = "mock"))]
pub use remote::{MockReply, MockScoringClient};
pub use remote::{
    PrefillToken, RemoteScoringError, ScoringClient, ScoringRequest, ScoringResponse, TgiClient,
    parse_scoring_response, resolve_endpoint,
};
#[cfg(any(test, feature = "mock"))]
pub use tokenizer::MockTokenizer;
pub use tokenizer::{HfTokenizer, TextTokenizer, TokenizerError, TokenizerMetadata};

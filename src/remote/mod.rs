//! Remote prefill scoring.
//!
//! Requesting exactly one new token with `decoder_input_details` makes a
//! text-generation-inference server report log-probabilities for the whole
//! input prefix, which turns a generation endpoint into a scoring endpoint.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


pub use client::{ScoringClient, TgiClient, resolve_endpoint};
pub use error::RemoteScoringError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockReply, MockScoringClient};
pub use types::{
    PrefillToken, ScoringParameters, ScoringRequest, ScoringResponse, parse_scoring_response,
};

//! Tokenization reconciliation.
//!
//! The harness tokenizes once, possibly with a different special-token policy.
//! Before scoring, the adapter decodes (when no text was given), re-encodes,
//! and checks that the remote model will see the same prefix. Leading-token
//! drift (BOS handling, a leading space) is tolerated; anything deeper would
//! make the returned log-probabilities describe a different prefix.
//!
//! The re-encoding is truncated to the harness length before comparison, so
//! extra trailing tokens never affect the verdict. They are reported through a
//! `debug!` event so the truncation can be audited.

pub mod error;
pub mod types;


pub use error::TokenizationError;
pub use types::{AlignmentVerdict, Reconciled};

use tracing::debug;

use crate::tokenizer::TextTokenizer;

/// Reconciles harness token ids with the configured tokenizer.
pub struct Reconciler<'a, T: TextTokenizer + ?Sized> {
    tokenizer: &'a T,
}

impl<'a, T: TextTokenizer + ?Sized> Reconciler<'a, T> {
    pub fn new(tokenizer: &'a T) -> Self {
        Self { tokenizer }
    }

    /// Produces the canonical text for `token_ids`.
    ///
    /// Returns [`TokenizationError::Mismatch`] when the re-encoding diverges past
    /// the first two positions. On success the verdict is `Match` or `MinorDrift`;
    /// callers decide how to surface drift.
    pub fn reconcile(
        &self,
        token_ids: &[u32],
        text: Option<&str>,
    ) -> Result<Reconciled, TokenizationError> {
        let text = match text {
            Some(text) => text.to_string(),
            None => self.tokenizer.decode(token_ids)?,
        };

        let mut re_encoded = self.tokenizer.encode(&text)?;
        if re_encoded.len() > token_ids.len() {
            debug!(
                expected_len = token_ids.len(),
                re_encoded_len = re_encoded.len(),
                discarded = re_encoded.len() - token_ids.len(),
                "Re-encoding longer than harness tokens, truncating before comparison"
            );
            re_encoded.truncate(token_ids.len());
        }

        match AlignmentVerdict::classify(token_ids, &re_encoded) {
            AlignmentVerdict::Mismatch { expected, actual } => {
                Err(TokenizationError::Mismatch { expected, actual })
            }
            verdict => Ok(Reconciled { text, verdict }),
        }
    }
}

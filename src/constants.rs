//! Cross-cutting, shared constants.
//!
//! Wire parameters live here so the request shape and the tests that pin it
//! cannot drift apart.

/// Default scoring endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/generate";

/// Context length reported when neither the configuration nor the tokenizer
/// provides a usable bound.
pub const DEFAULT_MAX_LENGTH: usize = 2048;

/// Sentinel `model_max_length` written by tokenizer configs with no bound (`int(1e30)`).
pub const UNBOUNDED_MODEL_MAX_LENGTH: u128 = 1_000_000_000_000_000_019_884_624_838_656;

/// Generation budget reported to the harness. Generation itself is unsupported.
pub const MAX_GEN_TOKS: usize = 256;

/// Effective batch size. Every item is one remote request.
pub const EFFECTIVE_BATCH_SIZE: usize = 1;

/// Default upper bound for auto-tuned batch sizes (recorded, not used for dispatch).
pub const DEFAULT_MAX_BATCH_SIZE: usize = 512;

/// Device reported to the harness; all compute happens remotely.
pub const DEVICE: &str = "cpu";

/// `max_new_tokens` sent with every scoring request. One token is enough to
/// make the server run a full prefill pass.
pub const SCORING_MAX_NEW_TOKENS: u32 = 1;

/// Number of leading positions allowed to differ before a re-encoding counts
/// as a mismatch.
pub const TOLERATED_LEADING_DRIFT: usize = 2;

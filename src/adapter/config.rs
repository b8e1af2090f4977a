use crate::config::BatchSize;
use crate::constants::DEFAULT_ENDPOINT;

#[derive(Debug, Clone, PartialEq)]
/// Explicit settings for [`TgiAdapter`](super::TgiAdapter).
pub struct AdapterConfig {
    /// Default scoring endpoint.
    pub endpoint: String,
    /// Context length override; `None` or `Some(0)` defers to the tokenizer.
    pub max_length: Option<usize>,
    /// Maximum in-flight requests per batch.
    pub max_concurrency: usize,
    /// Requested batch size (reported only).
    pub batch_size: BatchSize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_length: None,
            max_concurrency: 1,
            batch_size: BatchSize::default(),
        }
    }
}

impl AdapterConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Values below 1 are clamped to 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_batch_size(mut self, batch_size: BatchSize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

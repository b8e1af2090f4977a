//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    /// A numeric variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Batch size is neither a positive integer nor `auto[:schedule]`.
    #[error("invalid batch size '{value}': {reason}")]
    InvalidBatchSize { value: String, reason: String },

    /// A setting that must be at least 1 was 0.
    #[error("{name} must be at least 1")]
    MustBePositive { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },
}

//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TGI_SCORER_*` environment
//! variables; the endpoint also honours the legacy `ENDPOINT` variable.
//! Environment lookup happens only here; the library core takes an explicit
//! [`AdapterConfig`](crate::adapter::AdapterConfig).

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::adapter::AdapterConfig;
use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_MAX_BATCH_SIZE};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Requested batch size. Recorded for reporting; dispatch is always one item
/// per request.
pub enum BatchSize {
    /// Fixed size.
    Fixed(usize),
    /// Auto-detected size, re-detected `schedule` times over a run.
    Auto {
        /// Re-detection schedule (defaults to 1).
        schedule: f64,
    },
}

impl Default for BatchSize {
    fn default() -> Self {
        BatchSize::Fixed(1)
    }
}

impl FromStr for BatchSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let invalid = |reason: &str| ConfigError::InvalidBatchSize {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if let Some(rest) = value.strip_prefix("auto") {
            let schedule = match rest.strip_prefix(':') {
                Some(raw) => raw
                    .parse::<f64>()
                    .map_err(|_| invalid("schedule must be a number"))?,
                None if rest.is_empty() => 1.0,
                None => return Err(invalid("expected 'auto' or 'auto:<schedule>'")),
            };
            if !schedule.is_finite() || schedule <= 0.0 {
                return Err(invalid("schedule must be positive"));
            }
            return Ok(BatchSize::Auto { schedule });
        }

        match value.parse::<usize>() {
            Ok(0) => Err(invalid("must be at least 1")),
            Ok(n) => Ok(BatchSize::Fixed(n)),
            Err(_) => Err(invalid("expected a positive integer or 'auto'")),
        }
    }
}

impl std::fmt::Display for BatchSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchSize::Fixed(n) => write!(f, "{}", n),
            BatchSize::Auto { schedule } => write!(f, "auto:{}", schedule),
        }
    }
}

/// Adapter configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TGI_SCORER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring endpoint. Default: `http://127.0.0.1:8080/generate`.
    pub endpoint: String,

    /// Model directory or `tokenizer.json` path.
    pub tokenizer_path: Option<PathBuf>,

    /// Context length override (0 or unset defers to the tokenizer).
    pub max_length: Option<usize>,

    /// Requested batch size. Default: `1`.
    pub batch_size: BatchSize,

    /// Upper bound for auto batch sizes. Default: `512`.
    pub max_batch_size: usize,

    /// Maximum in-flight scoring requests per batch. Default: `1` (sequential).
    pub max_concurrency: usize,

    /// Per-request transport timeout. Default: none.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tokenizer_path: None,
            max_length: None,
            batch_size: BatchSize::default(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_concurrency: 1,
            request_timeout: None,
        }
    }
}

impl Config {
    const ENV_ENDPOINT: &'static str = "TGI_SCORER_ENDPOINT";
    const ENV_LEGACY_ENDPOINT: &'static str = "ENDPOINT";
    const ENV_TOKENIZER_PATH: &'static str = "TGI_SCORER_TOKENIZER_PATH";
    const ENV_MAX_LENGTH: &'static str = "TGI_SCORER_MAX_LENGTH";
    const ENV_BATCH_SIZE: &'static str = "TGI_SCORER_BATCH_SIZE";
    const ENV_MAX_BATCH_SIZE: &'static str = "TGI_SCORER_MAX_BATCH_SIZE";
    const ENV_MAX_CONCURRENCY: &'static str = "TGI_SCORER_MAX_CONCURRENCY";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "TGI_SCORER_REQUEST_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let endpoint = Self::parse_non_empty_from_env(Self::ENV_ENDPOINT)
            .or_else(|| Self::parse_non_empty_from_env(Self::ENV_LEGACY_ENDPOINT))
            .unwrap_or(defaults.endpoint);
        let tokenizer_path =
            Self::parse_non_empty_from_env(Self::ENV_TOKENIZER_PATH).map(PathBuf::from);
        let max_length = Self::parse_usize_from_env(Self::ENV_MAX_LENGTH)?.filter(|n| *n > 0);
        let batch_size = match Self::parse_non_empty_from_env(Self::ENV_BATCH_SIZE) {
            Some(value) => value.parse()?,
            None => defaults.batch_size,
        };
        let max_batch_size =
            Self::parse_usize_from_env(Self::ENV_MAX_BATCH_SIZE)?.unwrap_or(defaults.max_batch_size);
        let max_concurrency = Self::parse_usize_from_env(Self::ENV_MAX_CONCURRENCY)?
            .unwrap_or(defaults.max_concurrency);
        let request_timeout = Self::parse_usize_from_env(Self::ENV_REQUEST_TIMEOUT_SECS)?
            .filter(|secs| *secs > 0)
            .map(|secs| Duration::from_secs(secs as u64));

        Ok(Self {
            endpoint,
            tokenizer_path,
            max_length,
            batch_size,
            max_batch_size,
            max_concurrency,
            request_timeout,
        })
    }

    /// Validates the endpoint, paths and numeric bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url =
            reqwest::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
                value: self.endpoint.clone(),
                reason: e.to_string(),
            })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                value: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if let Some(ref path) = self.tokenizer_path
            && !path.exists()
        {
            return Err(ConfigError::PathNotFound { path: path.clone() });
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_MAX_CONCURRENCY,
            });
        }

        if self.max_batch_size == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_MAX_BATCH_SIZE,
            });
        }

        Ok(())
    }

    /// Core adapter settings derived from this configuration.
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            endpoint: self.endpoint.clone(),
            max_length: self.max_length,
            max_concurrency: self.max_concurrency,
            batch_size: self.batch_size,
        }
    }

    fn parse_non_empty_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(name: &'static str) -> Result<Option<usize>, ConfigError> {
        match Self::parse_non_empty_from_env(name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::InvalidNumber {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(None),
        }
    }
}

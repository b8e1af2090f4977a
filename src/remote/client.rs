use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::error::RemoteScoringError;
use super::types::{ScoringRequest, ScoringResponse, parse_scoring_response};

#[async_trait]
/// Prefix scoring against a remote endpoint.
pub trait ScoringClient: Send + Sync {
    /// Scores the full prefix of `text` at `endpoint`.
    async fn score(
        &self,
        text: &str,
        endpoint: &str,
    ) -> Result<ScoringResponse, RemoteScoringError>;
}

/// Picks the per-call override when it is non-empty, otherwise the default.
pub fn resolve_endpoint<'a>(override_endpoint: Option<&'a str>, default: &'a str) -> &'a str {
    match override_endpoint {
        Some(endpoint) if !endpoint.trim().is_empty() => endpoint,
        _ => default,
    }
}

/// HTTP client for a text-generation-inference `/generate` endpoint.
#[derive(Debug, Clone)]
pub struct TgiClient {
    http: HttpClient,
}

impl Default for TgiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TgiClient {
    /// Creates a client with no request timeout.
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
        }
    }

    /// Creates a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: HttpClient::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
        }
    }

    /// Wraps a preconfigured `reqwest` client.
    pub fn from_http_client(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ScoringClient for TgiClient {
    async fn score(
        &self,
        text: &str,
        endpoint: &str,
    ) -> Result<ScoringResponse, RemoteScoringError> {
        let request = ScoringRequest::new(text);

        debug!(
            endpoint = endpoint,
            text_len = text.len(),
            "Submitting scoring request"
        );

        let resp = self.http.post(endpoint).json(&request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let response = parse_scoring_response(&body).map_err(|e| match e {
            RemoteScoringError::MalformedResponse { reason } if !status.is_success() => {
                RemoteScoringError::MalformedResponse {
                    reason: format!("HTTP {}: {}", status, reason),
                }
            }
            other => other,
        })?;

        debug!(
            status = status.as_u16(),
            prefill_len = response.len(),
            "Scoring response received"
        );

        Ok(response)
    }
}

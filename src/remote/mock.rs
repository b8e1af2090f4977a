use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::client::ScoringClient;
use super::error::RemoteScoringError;
use super::types::{PrefillToken, ScoringResponse};

#[derive(Debug, Clone)]
/// Scripted reply for one input text.
pub enum MockReply {
    Prefill(Vec<PrefillToken>),
    ServerError(String),
}

/// In-memory [`ScoringClient`] that records every call.
///
/// Texts without a scripted reply get one prefill entry per whitespace word:
/// entry `i` has logprob `-(i + 1) / 10` (`null` for `i == 0`) and predicted id `i`.
#[derive(Debug, Default)]
pub struct MockScoringClient {
    replies: HashMap<String, MockReply>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockScoringClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, text: impl Into<String>, reply: MockReply) -> Self {
        self.replies.insert(text.into(), reply);
        self
    }

    pub fn with_delay(mut self, text: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(text.into(), delay);
        self
    }

    /// `(text, endpoint)` pairs in the order requests started.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn record(&self, text: &str, endpoint: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((text.to_string(), endpoint.to_string()));
        }
    }

    pub fn default_reply(text: &str) -> ScoringResponse {
        ScoringResponse::from_prefill(text.split_whitespace().enumerate().map(|(i, _)| {
            PrefillToken {
                logprob: (i > 0).then(|| -((i + 1) as f64) / 10.0),
                predicted_id: i as u32,
            }
        }))
    }
}

#[async_trait]
impl ScoringClient for MockScoringClient {
    async fn score(
        &self,
        text: &str,
        endpoint: &str,
    ) -> Result<ScoringResponse, RemoteScoringError> {
        self.record(text, endpoint);

        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }

        match self.replies.get(text) {
            Some(MockReply::Prefill(entries)) => {
                Ok(ScoringResponse::from_prefill(entries.iter().copied()))
            }
            Some(MockReply::ServerError(message)) => Err(RemoteScoringError::Server {
                message: message.clone(),
            }),
            None => Ok(Self::default_reply(text)),
        }
    }
}

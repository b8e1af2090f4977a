use serde::{Deserialize, Serialize};

use crate::constants::SCORING_MAX_NEW_TOKENS;

use super::error::RemoteScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Generation parameters that turn a `/generate` call into a prefill scoring call.
pub struct ScoringParameters {
    pub max_new_tokens: u32,
    pub decoder_input_details: bool,
}

impl Default for ScoringParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: SCORING_MAX_NEW_TOKENS,
            decoder_input_details: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Request body for one item.
pub struct ScoringRequest<'a> {
    pub inputs: &'a str,
    pub parameters: ScoringParameters,
}

impl<'a> ScoringRequest<'a> {
    pub fn new(inputs: &'a str) -> Self {
        Self {
            inputs,
            parameters: ScoringParameters::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
/// One prefill entry as reported by the server.
pub struct PrefillToken {
    /// `null` for the first prefix token.
    #[serde(default)]
    pub logprob: Option<f64>,
    pub predicted_id: u32,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    details: Option<RawDetails>,
}

#[derive(Debug, Deserialize)]
struct RawDetails {
    #[serde(default)]
    prefill: Option<Vec<PrefillToken>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Per-token log-probabilities and predicted ids for a scored prefix.
///
/// Both sequences come from the same prefill entries, so they always have the
/// same length.
pub struct ScoringResponse {
    logprobs: Vec<Option<f64>>,
    predicted_ids: Vec<u32>,
}

impl ScoringResponse {
    /// Builds a response from prefill entries, preserving order.
    pub fn from_prefill<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PrefillToken>,
    {
        let (logprobs, predicted_ids) = entries
            .into_iter()
            .map(|entry| (entry.logprob, entry.predicted_id))
            .unzip();
        Self {
            logprobs,
            predicted_ids,
        }
    }

    pub fn logprobs(&self) -> &[Option<f64>] {
        &self.logprobs
    }

    pub fn predicted_ids(&self) -> &[u32] {
        &self.predicted_ids
    }

    pub fn len(&self) -> usize {
        self.logprobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logprobs.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Option<f64>>, Vec<u32>) {
        (self.logprobs, self.predicted_ids)
    }

    /// Sum of log-probabilities from `start` to the end of the prefix.
    ///
    /// `None` when `start` is past the end or any summed entry is `null`.
    pub fn continuation_logprob(&self, start: usize) -> Option<f64> {
        self.logprobs.get(start..)?.iter().copied().sum()
    }

    /// Returns `true` if the model's prediction equals `targets[i]` for every
    /// position from `start` on. Lengths must agree.
    pub fn is_greedy(&self, targets: &[u32], start: usize) -> bool {
        match (self.predicted_ids.get(start..), targets.get(start..)) {
            (Some(predicted), Some(targets)) => predicted == targets,
            _ => false,
        }
    }
}

/// Parses a scoring response body.
///
/// A reported `error` wins over any other content.
pub fn parse_scoring_response(body: &str) -> Result<ScoringResponse, RemoteScoringError> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| RemoteScoringError::MalformedResponse {
            reason: e.to_string(),
        })?;

    if let Some(error) = raw.error {
        let message = match error {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        };
        return Err(RemoteScoringError::Server { message });
    }

    let prefill = raw
        .details
        .and_then(|details| details.prefill)
        .ok_or_else(|| RemoteScoringError::MalformedResponse {
            reason: "missing details.prefill".to_string(),
        })?;

    Ok(ScoringResponse::from_prefill(prefill))
}

use crate::remote::ScoringResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One harness request: token ids plus the text they came from, if known.
pub struct BatchItem {
    pub token_ids: Vec<u32>,
    pub text: Option<String>,
}

impl BatchItem {
    /// Item whose text will be decoded from `token_ids`.
    pub fn new(token_ids: Vec<u32>) -> Self {
        Self {
            token_ids,
            text: None,
        }
    }

    pub fn with_text(token_ids: Vec<u32>, text: impl Into<String>) -> Self {
        Self {
            token_ids,
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Responses for a whole batch, in item order.
pub struct BatchScores {
    pub responses: Vec<ScoringResponse>,
    /// Items admitted with leading-token drift.
    pub minor_drift_count: usize,
}

impl BatchScores {
    /// Splits into the parallel sequences the harness consumes.
    pub fn into_sequences(self) -> ModelCallOutput {
        self.responses
            .into_iter()
            .map(ScoringResponse::into_parts)
            .unzip()
    }
}

/// Per-item log-probabilities and predicted ids, as parallel sequences.
pub type ModelCallOutput = (Vec<Vec<Option<f64>>>, Vec<Vec<u32>>);

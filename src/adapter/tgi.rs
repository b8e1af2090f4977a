use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use crate::config::BatchSize;
use crate::constants::{
    DEFAULT_MAX_LENGTH, DEVICE, EFFECTIVE_BATCH_SIZE, MAX_GEN_TOKS, UNBOUNDED_MODEL_MAX_LENGTH,
};
use crate::reconcile::{AlignmentVerdict, Reconciler};
use crate::remote::{ScoringClient, ScoringResponse, resolve_endpoint};
use crate::tokenizer::TextTokenizer;

use super::ScoringAdapter;
use super::config::AdapterConfig;
use super::error::AdapterError;
use super::types::{BatchItem, BatchScores, ModelCallOutput};

/// Scoring adapter for a remote text-generation-inference endpoint.
pub struct TgiAdapter<T, C> {
    tokenizer: T,
    client: C,
    config: AdapterConfig,
}

impl<T, C> std::fmt::Debug for TgiAdapter<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TgiAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: TextTokenizer, C: ScoringClient> TgiAdapter<T, C> {
    pub fn new(tokenizer: T, client: C, config: AdapterConfig) -> Self {
        info!(
            endpoint = %config.endpoint,
            max_concurrency = config.max_concurrency,
            requested_batch_size = %config.batch_size,
            effective_batch_size = EFFECTIVE_BATCH_SIZE,
            "TGI scoring adapter ready"
        );
        Self {
            tokenizer,
            client,
            config,
        }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Default endpoint used when no per-call override is given.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Batch size requested in configuration. Dispatch ignores it.
    pub fn configured_batch_size(&self) -> BatchSize {
        self.config.batch_size
    }

    /// Reconciles every item, failing on the first mismatch.
    ///
    /// Returns the canonical texts in item order and the number of items
    /// admitted with leading-token drift.
    pub fn reconcile_batch(
        &self,
        items: &[BatchItem],
    ) -> Result<(Vec<String>, usize), AdapterError> {
        let reconciler = Reconciler::new(&self.tokenizer);
        let mut texts = Vec::with_capacity(items.len());
        let mut minor_drift_count = 0usize;

        for (item, batch_item) in items.iter().enumerate() {
            let reconciled = reconciler
                .reconcile(&batch_item.token_ids, batch_item.text.as_deref())
                .map_err(|source| AdapterError::Tokenization { item, source })?;

            if let AlignmentVerdict::MinorDrift { expected, actual } = &reconciled.verdict {
                warn!(
                    item = item,
                    expected = ?expected,
                    actual = ?actual,
                    "Leading tokens differ after re-encoding; perplexity may shift slightly"
                );
                minor_drift_count += 1;
            }

            texts.push(reconciled.text);
        }

        Ok((texts, minor_drift_count))
    }

    /// Scores a batch at the configured endpoint.
    pub async fn score_batch(&self, items: &[BatchItem]) -> Result<BatchScores, AdapterError> {
        self.score_batch_at(items, None).await
    }

    /// Scores a batch, one remote request per item, preserving item order.
    ///
    /// All items are reconciled before any request is sent, so a mismatch never
    /// produces network traffic. A tokenization error on any item therefore
    /// wins over a remote error on an earlier item. The first failing request
    /// aborts the batch and no partial results are returned.
    pub async fn score_batch_at(
        &self,
        items: &[BatchItem],
        endpoint_override: Option<&str>,
    ) -> Result<BatchScores, AdapterError> {
        let endpoint = resolve_endpoint(endpoint_override, &self.config.endpoint);
        let (texts, minor_drift_count) = self.reconcile_batch(items)?;

        info!(
            items = items.len(),
            minor_drift_count = minor_drift_count,
            endpoint = endpoint,
            max_concurrency = self.config.max_concurrency,
            "Scoring batch"
        );

        let responses: Vec<ScoringResponse> = stream::iter(texts.into_iter().enumerate())
            .map(|(item, text)| async move {
                self.client
                    .score(&text, endpoint)
                    .await
                    .map_err(|source| AdapterError::RemoteScoring { item, source })
            })
            .buffered(self.config.max_concurrency.max(1))
            .try_collect()
            .await?;

        debug!(responses = responses.len(), "Batch scored");

        Ok(BatchScores {
            responses,
            minor_drift_count,
        })
    }
}

#[async_trait]
impl<T: TextTokenizer, C: ScoringClient> ScoringAdapter for TgiAdapter<T, C> {
    fn tok_encode(&self, text: &str) -> Result<Vec<u32>, AdapterError> {
        Ok(self.tokenizer.encode(text)?)
    }

    fn tok_decode(&self, ids: &[u32]) -> Result<String, AdapterError> {
        Ok(self.tokenizer.decode(ids)?)
    }

    async fn model_call(
        &self,
        inputs: &[Vec<u32>],
        texts: Option<&[Option<String>]>,
    ) -> Result<ModelCallOutput, AdapterError> {
        if let Some(texts) = texts
            && texts.len() != inputs.len()
        {
            return Err(AdapterError::InvalidInput {
                reason: format!(
                    "got {} texts for {} token sequences",
                    texts.len(),
                    inputs.len()
                ),
            });
        }

        let items: Vec<BatchItem> = inputs
            .iter()
            .enumerate()
            .map(|(i, token_ids)| BatchItem {
                token_ids: token_ids.clone(),
                text: texts.and_then(|t| t[i].clone()),
            })
            .collect();

        Ok(self.score_batch(&items).await?.into_sequences())
    }

    fn model_generate(
        &self,
        _context: &[u32],
        _max_length: usize,
        _eos_token_id: Option<u32>,
    ) -> Result<Vec<u32>, AdapterError> {
        Err(AdapterError::UnsupportedOperation {
            operation: "generate",
        })
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.vocab_size()
    }

    fn eot_token_id(&self) -> Option<u32> {
        self.tokenizer.eos_token_id()
    }

    fn max_length(&self) -> usize {
        if let Some(max_length) = self.config.max_length
            && max_length > 0
        {
            return max_length;
        }

        match self.tokenizer.model_max_length() {
            Some(UNBOUNDED_MODEL_MAX_LENGTH) | None => DEFAULT_MAX_LENGTH,
            Some(len) => usize::try_from(len).unwrap_or(DEFAULT_MAX_LENGTH),
        }
    }

    fn max_gen_toks(&self) -> usize {
        MAX_GEN_TOKS
    }

    fn batch_size(&self) -> usize {
        EFFECTIVE_BATCH_SIZE
    }

    fn device(&self) -> &str {
        DEVICE
    }
}

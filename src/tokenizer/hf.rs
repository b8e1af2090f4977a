use std::path::Path;

use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::constants::UNBOUNDED_MODEL_MAX_LENGTH;

use super::TextTokenizer;
use super::error::TokenizerError;
use super::utils::{resolve_tokenizer_file, sibling_tokenizer_config};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Properties that live in `tokenizer_config.json` rather than `tokenizer.json`.
pub struct TokenizerMetadata {
    /// Maximum model context, possibly the unbounded sentinel.
    pub model_max_length: Option<u128>,
    /// Resolved end-of-sequence token id.
    pub eos_token_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TokenizerConfigFile {
    #[serde(default)]
    model_max_length: Option<f64>,
    #[serde(default)]
    eos_token: Option<SpecialToken>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpecialToken {
    Plain(String),
    Added { content: String },
}

impl SpecialToken {
    fn content(&self) -> &str {
        match self {
            SpecialToken::Plain(s) => s,
            SpecialToken::Added { content } => content,
        }
    }
}

/// [`TextTokenizer`] backed by a HuggingFace `tokenizers::Tokenizer`.
pub struct HfTokenizer {
    inner: Tokenizer,
    metadata: TokenizerMetadata,
}

impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.inner.get_vocab_size(false))
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl HfTokenizer {
    /// Loads `tokenizer.json` (plus an optional sibling `tokenizer_config.json`)
    /// from a model directory or a tokenizer file path.
    pub fn load(path: &Path) -> Result<Self, TokenizerError> {
        let tokenizer_file = resolve_tokenizer_file(path)?;
        if !tokenizer_file.is_file() {
            return Err(TokenizerError::NotFound {
                path: tokenizer_file,
            });
        }

        let inner =
            Tokenizer::from_file(&tokenizer_file).map_err(|e| TokenizerError::LoadFailed {
                reason: format!("{}: {}", tokenizer_file.display(), e),
            })?;

        let metadata = match sibling_tokenizer_config(&tokenizer_file) {
            Some(config_path) => Self::read_metadata(&inner, &config_path)?,
            None => {
                debug!(
                    tokenizer = %tokenizer_file.display(),
                    "No tokenizer_config.json next to tokenizer, metadata left empty"
                );
                TokenizerMetadata::default()
            }
        };

        info!(
            tokenizer = %tokenizer_file.display(),
            vocab_size = inner.get_vocab_size(false),
            eos_token_id = ?metadata.eos_token_id,
            model_max_length = ?metadata.model_max_length,
            "Tokenizer loaded"
        );

        Ok(Self { inner, metadata })
    }

    /// Wraps an already constructed tokenizer.
    pub fn from_tokenizer(inner: Tokenizer, metadata: TokenizerMetadata) -> Self {
        Self { inner, metadata }
    }

    pub fn metadata(&self) -> &TokenizerMetadata {
        &self.metadata
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }

    fn read_metadata(
        inner: &Tokenizer,
        config_path: &Path,
    ) -> Result<TokenizerMetadata, TokenizerError> {
        let raw = std::fs::read_to_string(config_path)?;
        let parsed: TokenizerConfigFile =
            serde_json::from_str(&raw).map_err(|e| TokenizerError::InvalidConfig {
                path: config_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let model_max_length = parsed.model_max_length.and_then(normalize_max_length);
        let eos_token_id = parsed
            .eos_token
            .as_ref()
            .and_then(|token| inner.token_to_id(token.content()));

        Ok(TokenizerMetadata {
            model_max_length,
            eos_token_id,
        })
    }
}

/// JSON configs store the sentinel as a float (`1e30`), which cannot be
/// represented exactly; anything at or above it is treated as the sentinel.
pub(super) fn normalize_max_length(value: f64) -> Option<u128> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    if value >= UNBOUNDED_MODEL_MAX_LENGTH as f64 {
        return Some(UNBOUNDED_MODEL_MAX_LENGTH);
    }
    Some(value as u128)
}

impl TextTokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        let encoding =
            self.inner
                .encode(text, false)
                .map_err(|e| TokenizerError::EncodeFailed {
                    reason: e.to_string(),
                })?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
        self.inner
            .decode(ids, false)
            .map_err(|e| TokenizerError::DecodeFailed {
                reason: e.to_string(),
            })
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(false)
    }

    fn eos_token_id(&self) -> Option<u32> {
        self.metadata.eos_token_id
    }

    fn model_max_length(&self) -> Option<u128> {
        self.metadata.model_max_length
    }
}

use std::collections::HashMap;

use super::TextTokenizer;
use super::error::TokenizerError;

/// Whitespace word-level tokenizer with a fixed vocabulary.
///
/// Ids are assigned in the order words are given, starting at 0. Decoding joins
/// words with a single space.
#[derive(Debug, Clone, Default)]
pub struct MockTokenizer {
    vocab: HashMap<String, u32>,
    words: Vec<String>,
    eos_token_id: Option<u32>,
    model_max_length: Option<u128>,
}

impl MockTokenizer {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokenizer = Self::default();
        for word in words {
            let word = word.into();
            if tokenizer.vocab.contains_key(&word) {
                continue;
            }
            let id = tokenizer.words.len() as u32;
            tokenizer.vocab.insert(word.clone(), id);
            tokenizer.words.push(word);
        }
        tokenizer
    }

    pub fn with_eos_token_id(mut self, id: u32) -> Self {
        self.eos_token_id = Some(id);
        self
    }

    pub fn with_model_max_length(mut self, len: u128) -> Self {
        self.model_max_length = Some(len);
        self
    }

    pub fn id_of(&self, word: &str) -> Option<u32> {
        self.vocab.get(word).copied()
    }
}

impl TextTokenizer for MockTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        text.split_whitespace()
            .map(|word| {
                self.vocab
                    .get(word)
                    .copied()
                    .ok_or_else(|| TokenizerError::EncodeFailed {
                        reason: format!("unknown word '{word}'"),
                    })
            })
            .collect()
    }

    fn decode(&self, ids: &[u32]) -> Result<String, TokenizerError> {
        let words = ids
            .iter()
            .map(|id| {
                self.words
                    .get(*id as usize)
                    .map(String::as_str)
                    .ok_or_else(|| TokenizerError::DecodeFailed {
                        reason: format!("id {id} out of vocabulary"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words.join(" "))
    }

    fn vocab_size(&self) -> usize {
        self.words.len()
    }

    fn eos_token_id(&self) -> Option<u32> {
        self.eos_token_id
    }

    fn model_max_length(&self) -> Option<u128> {
        self.model_max_length
    }
}

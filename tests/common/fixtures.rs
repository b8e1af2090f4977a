//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Word-level vocabulary used by [`word_level_tokenizer_dir`].
pub const VOCAB: &[(&str, u32)] = &[
    ("[UNK]", 0),
    ("</s>", 1),
    ("the", 2),
    ("quick", 3),
    ("brown", 4),
    ("fox", 5),
    ("jumps", 6),
    ("<s>", 7),
];

/// Writes a whitespace word-level `tokenizer.json` (and optionally a
/// `tokenizer_config.json`) into a fresh temp directory.
pub fn word_level_tokenizer_dir(config: Option<Value>) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_tokenizer(dir.path(), config);
    dir
}

fn write_tokenizer(dir: &Path, config: Option<Value>) {
    let vocab: serde_json::Map<String, Value> = VOCAB
        .iter()
        .map(|(word, id)| (word.to_string(), json!(id)))
        .collect();

    let tokenizer = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
    });

    std::fs::write(dir.join("tokenizer.json"), tokenizer.to_string()).expect("write tokenizer");
    if let Some(config) = config {
        std::fs::write(dir.join("tokenizer_config.json"), config.to_string())
            .expect("write tokenizer config");
    }
}

/// Builds a successful scoring body from `(logprob, predicted_id)` pairs.
pub fn prefill_body(entries: &[(Option<f64>, u32)]) -> Value {
    let prefill: Vec<Value> = entries
        .iter()
        .map(|(logprob, predicted_id)| json!({ "logprob": logprob, "predicted_id": predicted_id }))
        .collect();
    json!({ "generated_text": "x", "details": { "prefill": prefill } })
}

/// The request body the adapter must send for `text`.
pub fn expected_request(text: &str) -> Value {
    json!({
        "inputs": text,
        "parameters": { "max_new_tokens": 1, "decoder_input_details": true }
    })
}

//! tgi-scorer command-line entrypoint.
//!
//! Reads JSON Lines requests from a file (or stdin when the path is `-` or
//! omitted), scores them against the configured endpoint, and writes one JSON
//! line per item to stdout.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use mimalloc::MiMalloc;
use serde::{Deserialize, Serialize};

use tgi_scorer::config::Config;
use tgi_scorer::{BatchItem, HfTokenizer, ScoringAdapter, TextTokenizer, TgiAdapter, TgiClient};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Deserialize)]
struct InputLine {
    #[serde(default)]
    token_ids: Option<Vec<u32>>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputLine<'a> {
    logprobs: &'a [Option<f64>],
    predicted_ids: &'a [u32],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let Some(tokenizer_path) = config.tokenizer_path.clone() else {
        bail!("TGI_SCORER_TOKENIZER_PATH must point to a model directory or tokenizer.json");
    };

    tracing::info!(
        endpoint = %config.endpoint,
        tokenizer = %tokenizer_path.display(),
        batch_size = %config.batch_size,
        max_batch_size = config.max_batch_size,
        "tgi-scorer starting"
    );

    let tokenizer = HfTokenizer::load(&tokenizer_path)?;
    let client = match config.request_timeout {
        Some(timeout) => TgiClient::with_timeout(timeout),
        None => TgiClient::new(),
    };
    let adapter = TgiAdapter::new(tokenizer, client, config.adapter_config());

    let input = std::env::args().nth(1).filter(|arg| arg != "-");
    let items = read_items(&adapter, input.map(PathBuf::from))?;

    let scores = adapter.score_batch(&items).await?;
    tracing::info!(
        items = scores.responses.len(),
        minor_drift_count = scores.minor_drift_count,
        max_length = adapter.max_length(),
        "Scoring complete"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for response in &scores.responses {
        let line = OutputLine {
            logprobs: response.logprobs(),
            predicted_ids: response.predicted_ids(),
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}

fn read_items<T, C>(
    adapter: &TgiAdapter<T, C>,
    path: Option<PathBuf>,
) -> anyhow::Result<Vec<BatchItem>>
where
    T: TextTokenizer,
    C: tgi_scorer::ScoringClient,
{
    let reader: Box<dyn BufRead> = match &path {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut items = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: InputLine = serde_json::from_str(&line)
            .with_context(|| format!("line {}: invalid request", line_no + 1))?;

        let item = match (parsed.token_ids, parsed.text) {
            (Some(token_ids), text) => BatchItem { token_ids, text },
            (None, Some(text)) => BatchItem::with_text(adapter.tok_encode(&text)?, text),
            (None, None) => bail!("line {}: needs token_ids or text", line_no + 1),
        };
        items.push(item);
    }

    Ok(items)
}

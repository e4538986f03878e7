//! taskrank-ingest: load raw task batches (JSON or CSV) from files or stdin.

pub mod parsers;
pub mod types;

pub use parsers::csv_tasks::parse_tasks_csv;
pub use parsers::json_batch::parse_json_request;
pub use types::{BatchFormat, BatchSource};

use anyhow::{Context, Result};
use std::io::Read;
use taskrank_core::AnalyzeRequest;

/// Read a batch from `source` and shape it into an [`AnalyzeRequest`].
///
/// `format` overrides detection; otherwise the file extension decides and
/// anything unrecognised (including stdin) is read as JSON.
pub fn load_request(source: &BatchSource, format: Option<BatchFormat>) -> Result<AnalyzeRequest> {
    let format = format.unwrap_or_else(|| source.detect_format());
    let text = read_source(source)?;

    let request = match format {
        BatchFormat::Json => parse_json_request(&text)
            .with_context(|| format!("parsing JSON batch from {source}"))?,
        BatchFormat::Csv => AnalyzeRequest::new(
            parse_tasks_csv(text.as_bytes())
                .with_context(|| format!("parsing CSV batch from {source}"))?,
        ),
    };

    tracing::debug!(%source, ?format, tasks = request.tasks.len(), "loaded batch");
    Ok(request)
}

fn read_source(source: &BatchSource) -> Result<String> {
    match source {
        BatchSource::Stdin => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("reading stdin")?;
            Ok(s)
        }
        BatchSource::Path(p) => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
    }
}

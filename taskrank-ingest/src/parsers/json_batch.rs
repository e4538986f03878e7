//! JSON batch parser.
//!
//! Accepts the same body the HTTP endpoint takes: an object with `tasks`
//! (plus optional `strategy` / `custom_weights`) or a bare list of tasks.

use anyhow::{Context, Result};
use serde_json::Value;
use taskrank_core::AnalyzeRequest;

pub fn parse_json_request(text: &str) -> Result<AnalyzeRequest> {
    let value: Value = serde_json::from_str(text).context("invalid JSON")?;
    Ok(AnalyzeRequest::from_value(value)?)
}

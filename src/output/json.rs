//! JSON output formatting
//!
//! Serializes a [`Report`] as one pretty-printed document. Per-width maps are
//! keyed by `k` (as strings, since JSON keys are always strings).

use crate::coordinator::Report;
use crate::Result;
use anyhow::Context;
use std::io::{self, Write};

/// Serialize a report to a JSON string
pub fn to_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Print a report as JSON on stdout
pub fn print_report(report: &Report) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, report).context("Failed to write JSON report")?;
    writeln!(out)?;
    Ok(())
}

//! Report output
//!
//! Text tables for people, JSON for scripts. Both write to stdout; logs go to
//! stderr so the two never mix.

pub mod json;
pub mod text;

use crate::config::{OutputConfig, OutputFormat};
use crate::coordinator::Report;
use crate::Result;

/// Print a report in the configured format
pub fn print_report(report: &Report, output: &OutputConfig) -> Result<()> {
    match output.format {
        OutputFormat::Text => text::print_report(report, output.histogram_radius),
        OutputFormat::Json => json::print_report(report),
    }
}

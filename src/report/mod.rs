//! Rendering of check results.
//!
//! This module provides reporters that turn a [`CheckReport`] into text
//! for a terminal or JSON for other tools.

pub mod json;
pub mod text;

use crate::check::CheckReport;
use std::io::{self, Write};

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Plain text - one finding per line, or the success summary
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "Unknown report format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for reporters.
pub trait Reporter {
    /// Write the report to the given writer.
    fn report<W: Write>(&self, report: &CheckReport, writer: &mut W) -> io::Result<()>;
}

/// Render a report in the specified format.
pub fn render<W: Write>(
    format: ReportFormat,
    report: &CheckReport,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => text::TextReporter.report(report, writer),
        ReportFormat::Json => json::JsonReporter.report(report, writer),
    }
}

/// Render a report to a string.
pub fn render_to_string(format: ReportFormat, report: &CheckReport) -> io::Result<String> {
    let mut buffer = Vec::new();
    render(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) fn sample_report(findings: Vec<crate::check::Finding>) -> CheckReport {
    CheckReport {
        checked: vec!["pkg-a".to_string(), "pkg-b".to_string()],
        skipped: vec!["legacy".to_string()],
        excluded: Vec::new(),
        findings,
        fail_on_findings: true,
    }
}

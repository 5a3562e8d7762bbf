//! JSON report.

use super::Reporter;
use crate::check::{CheckReport, Finding, FindingKind};
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter implementation.
pub struct JsonReporter;

/// Serializable finding for JSON output.
#[derive(Serialize)]
struct JsonFinding<'a> {
    kind: FindingKind,
    manifest: String,
    modules: &'a [String],
    message: String,
}

/// Root JSON report structure.
#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    checked: &'a [String],
    skipped: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    excluded: &'a [String],
    findings: Vec<JsonFinding<'a>>,
}

fn is_empty(names: &&[String]) -> bool {
    names.is_empty()
}

impl<'a> From<&'a Finding> for JsonFinding<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            kind: finding.kind,
            manifest: finding.manifest_path.display().to_string(),
            modules: &finding.modules,
            message: finding.message(),
        }
    }
}

impl Reporter for JsonReporter {
    fn report<W: Write>(&self, report: &CheckReport, writer: &mut W) -> io::Result<()> {
        let json = JsonReport {
            success: report.is_clean(),
            checked: &report.checked,
            skipped: &report.skipped,
            excluded: &report.excluded,
            findings: report.findings.iter().map(JsonFinding::from).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &json)?;
        writeln!(writer)?;
        Ok(())
    }
}

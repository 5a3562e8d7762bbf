//! Plain text report.

use super::Reporter;
use crate::check::CheckReport;
use std::io::{self, Write};

/// Text reporter implementation.
///
/// A clean run prints the checked and skipped workspaces followed by
/// `Success!`. Otherwise every finding is printed on its own line and
/// nothing else.
pub struct TextReporter;

impl Reporter for TextReporter {
    fn report<W: Write>(&self, report: &CheckReport, writer: &mut W) -> io::Result<()> {
        if !report.is_clean() {
            for finding in &report.findings {
                writeln!(writer, "{}", finding)?;
            }
            return Ok(());
        }

        writeln!(writer, "All dependencies correctly listed.")?;
        writeln!(writer)?;
        write_section(writer, "Checked:", &report.checked)?;
        write_section(writer, "Skipped:", &report.skipped)?;
        if !report.excluded.is_empty() {
            write_section(writer, "Excluded:", &report.excluded)?;
        }
        writeln!(writer, "Success!")?;
        Ok(())
    }
}

fn write_section<W: Write>(writer: &mut W, title: &str, names: &[String]) -> io::Result<()> {
    writeln!(writer, "{}", title)?;
    for name in names {
        writeln!(writer, "{}", name)?;
    }
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Finding, FindingKind};
    use crate::report::sample_report;

    fn render(report: &CheckReport) -> String {
        let mut out = Vec::new();
        TextReporter.report(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_success_summary() {
        let output = render(&sample_report(Vec::new()));

        assert_eq!(
            output,
            "All dependencies correctly listed.\n\
             \n\
             Checked:\npkg-a\npkg-b\n\
             \n\
             Skipped:\nlegacy\n\
             \n\
             Success!\n"
        );
    }

    #[test]
    fn test_excluded_section_only_when_present() {
        let mut report = sample_report(Vec::new());
        report.excluded.push("docs".to_string());

        let output = render(&report);
        assert!(output.contains("Excluded:\ndocs\n"));
        assert!(!render(&sample_report(Vec::new())).contains("Excluded:"));
    }

    #[test]
    fn test_findings_one_per_line() {
        let report = sample_report(vec![
            Finding::new(
                FindingKind::Unused,
                "/r/pkg-a/package.json",
                vec!["lodash".to_string()],
            ),
            Finding::new(
                FindingKind::Missing,
                "/r/pkg-b/package.json",
                vec!["chalk".to_string(), "zod".to_string()],
            ),
        ]);

        let output = render(&report);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Fail! Modules in /r/pkg-a/package.json not used in code: lodash",
                "Fail! Dependencies not listed in /r/pkg-b/package.json: chalk, zod",
            ]
        );
    }
}

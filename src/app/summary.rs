//! Per-file and whole-run summaries, printed as text or JSON.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use imgpull_core::BatchReport;
use serde::Serialize;

/// Result of processing one input list.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileSummary {
    pub(crate) path: PathBuf,
    pub(crate) malformed_lines: usize,
    pub(crate) duplicate_lines: usize,
    pub(crate) report: BatchReport,
}

/// Summed counts across every processed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Totals {
    pub(crate) skipped: usize,
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
    pub(crate) retried: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) files: Vec<FileSummary>,
    pub(crate) missing_inputs: Vec<PathBuf>,
    pub(crate) interrupted: bool,
}

impl RunSummary {
    pub(crate) fn totals(&self) -> Totals {
        self.files.iter().fold(Totals::default(), |acc, file| Totals {
            skipped: acc.skipped + file.report.skipped,
            succeeded: acc.succeeded + file.report.succeeded,
            failed: acc.failed + file.report.failed,
            retried: acc.retried + file.report.retried,
        })
    }

    /// Writes the summary as a single JSON document.
    pub(crate) fn write_json(&self, out: &mut impl Write) -> Result<()> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            #[serde(flatten)]
            summary: &'a RunSummary,
            totals: Totals,
        }

        serde_json::to_writer_pretty(
            &mut *out,
            &JsonReport {
                summary: self,
                totals: self.totals(),
            },
        )
        .context("failed to serialize run report")?;
        writeln!(out)?;
        Ok(())
    }

    /// Writes a human-readable summary.
    pub(crate) fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        for file in &self.files {
            writeln!(
                out,
                "{}: {} downloaded, {} skipped, {} failed",
                file.path.display(),
                file.report.succeeded,
                file.report.skipped,
                file.report.failed
            )?;
            for failure in &file.report.failures {
                writeln!(
                    out,
                    "  [{}] {} ({} attempt(s)): {}",
                    failure.kind.as_str(),
                    failure.identifier,
                    failure.attempts,
                    failure.message
                )?;
            }
        }
        for missing in &self.missing_inputs {
            writeln!(out, "{}: input file not found", missing.display())?;
        }

        let totals = self.totals();
        writeln!(
            out,
            "Total: {} downloaded, {} skipped, {} failed",
            totals.succeeded, totals.skipped, totals.failed
        )?;
        if self.interrupted {
            writeln!(out, "Interrupted. Run again to resume.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report(skipped: usize, succeeded: usize, failed: usize) -> BatchReport {
        BatchReport {
            skipped,
            succeeded,
            failed,
            retried: 1,
            ..BatchReport::default()
        }
    }

    fn summary() -> RunSummary {
        RunSummary {
            files: vec![
                FileSummary {
                    path: PathBuf::from("a.txt"),
                    malformed_lines: 0,
                    duplicate_lines: 0,
                    report: report(2, 2, 1),
                },
                FileSummary {
                    path: PathBuf::from("b.txt"),
                    malformed_lines: 1,
                    duplicate_lines: 0,
                    report: report(0, 3, 0),
                },
            ],
            missing_inputs: vec![PathBuf::from("c.txt")],
            interrupted: false,
        }
    }

    #[test]
    fn test_totals_sum_every_file() {
        assert_eq!(
            summary().totals(),
            Totals {
                skipped: 2,
                succeeded: 5,
                failed: 1,
                retried: 2,
            }
        );
    }

    #[test]
    fn test_text_summary_lists_files_and_totals() {
        let mut out = Vec::new();
        summary().write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("a.txt: 2 downloaded, 2 skipped, 1 failed"));
        assert!(text.contains("c.txt: input file not found"));
        assert!(text.contains("Total: 5 downloaded, 2 skipped, 1 failed"));
    }

    #[test]
    fn test_json_summary_includes_totals() {
        let mut out = Vec::new();
        summary().write_json(&mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["totals"]["succeeded"], 5);
        assert_eq!(json["files"][0]["report"]["failed"], 1);
        assert_eq!(json["missing_inputs"][0], "c.txt");
        assert_eq!(json["interrupted"], false);
    }
}

//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::cli::CommandSummary;
use anyhow::Result;
use packit_core::AddOutcome;
use packit_core::BuildReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct BuildOutput<'a> {
    archive: &'a str,
    files_added: usize,
    bytes_written: u64,
    bytes_compressed: u64,
    compression_percentage: f64,
    entries_skipped: usize,
    duration_ms: u128,
    warnings: &'a [String],
}

impl<'a> From<&'a BuildReport> for BuildOutput<'a> {
    fn from(report: &'a BuildReport) -> Self {
        Self {
            archive: &report.archive,
            files_added: report.files_added,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_percentage: report.compression_percentage(),
            entries_skipped: report.entries_skipped,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_banner(&self, commands: &[CommandSummary]) -> Result<()> {
        #[derive(Serialize)]
        struct BannerOutput<'a> {
            usage: &'static str,
            commands: &'a [CommandSummary],
        }

        let data = BannerOutput {
            usage: "packit <command> [flags] [arguments]",
            commands,
        };
        Self::output(&JsonOutput::success("help", data))
    }

    fn format_build_result(&self, report: &BuildReport) -> Result<()> {
        Self::output(&JsonOutput::success("build", BuildOutput::from(report)))
    }

    fn format_ignore_result(&self, outcome: &AddOutcome) -> Result<()> {
        #[derive(Serialize)]
        struct IgnoreOutput<'a> {
            added: &'a [String],
            unchanged: bool,
        }

        let data = IgnoreOutput {
            added: &outcome.added,
            unchanged: outcome.is_unchanged(),
        };
        Self::output(&JsonOutput::success("ignore", data))
    }

    fn format_exclude_list(&self, entries: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            excludes: &'a [String],
        }

        Self::output(&JsonOutput::success("list", ListOutput { excludes: entries }))
    }

    // Only the final result is printed so stdout stays a single document.
    fn format_info(&self, _message: &str) {}

    fn format_warning(&self, _message: &str) {}
}

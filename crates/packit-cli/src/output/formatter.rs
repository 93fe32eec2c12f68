//! Output formatter trait for CLI results.

use crate::cli::CommandSummary;
use anyhow::Result;
use packit_core::AddOutcome;
use packit_core::BuildReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the banner shown when no subcommand is given
    fn format_banner(&self, commands: &[CommandSummary]) -> Result<()>;

    /// Format build result
    fn format_build_result(&self, report: &BuildReport) -> Result<()>;

    /// Format the outcome of `ignore PATH...`
    fn format_ignore_result(&self, outcome: &AddOutcome) -> Result<()>;

    /// Format the current exclude list
    fn format_exclude_list(&self, entries: &[String]) -> Result<()>;

    /// Format informational message
    fn format_info(&self, message: &str);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }
}

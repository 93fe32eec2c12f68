//! Build reporting.

use std::time::Duration;

/// Report of one archive build.
///
/// # Examples
///
/// ```
/// use packit_core::BuildReport;
///
/// let mut report = BuildReport::default();
/// report.files_added = 10;
/// report.bytes_written = 1000;
/// report.bytes_compressed = 250;
///
/// assert_eq!(report.compression_percentage(), 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Output archive path, relative to the working directory.
    pub archive: String,

    /// Number of files written to the container.
    pub files_added: usize,

    /// Total bytes read from source files (uncompressed).
    pub bytes_written: u64,

    /// Size of the finished container.
    pub bytes_compressed: u64,

    /// Nodes that could not be stored (sockets, dangling symlinks, ...).
    pub entries_skipped: usize,

    /// Duration of the build.
    pub duration: Duration,

    /// Warnings generated during the build.
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// Creates an empty report for `archive`.
    #[must_use]
    pub fn new(archive: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            ..Self::default()
        }
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the space saved by compression, in percent.
    ///
    /// Returns 0.0 if nothing was written. Container overhead can make the
    /// archive larger than its contents, which also yields 0.0.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        let saved = self.bytes_written.saturating_sub(self.bytes_compressed);
        (saved as f64 / self.bytes_written as f64) * 100.0
    }
}

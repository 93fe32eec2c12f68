//! Archive builder: walk, filter and stream into the container.

use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::Archive;
use crate::ExcludeSet;
use crate::PackitError;
use crate::Result;
use crate::creation::config::BuildOptions;
use crate::creation::report::BuildReport;
use crate::creation::sink::ContainerSink;
use crate::creation::sink::create_sink;
use crate::creation::walker::PackWalker;
use crate::creation::walker::WalkItem;
use crate::indicator::NoopRender;
use crate::indicator::ProgressIndicator;
use crate::indicator::SpinnerRender;

/// Builds one archive from a directory tree.
///
/// The container is created inside `root` before the walk starts and is
/// skipped by the walk. On failure the partially written container is left
/// on disk.
///
/// # Examples
///
/// ```no_run
/// use packit_core::Archive;
/// use packit_core::ArchiveBuilder;
/// use packit_core::ArchiveFormat;
/// use packit_core::ExcludeStore;
/// use std::path::Path;
///
/// let root = Path::new(".");
/// let excludes = ExcludeStore::new(root).load()?;
/// let archive = Archive::for_directory(&root.canonicalize()?, None, ArchiveFormat::Zip)?
///     .with_excludes(excludes.into_entries());
///
/// let report = ArchiveBuilder::new(root, archive).build()?;
/// println!("added {} files", report.files_added);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    root: PathBuf,
    archive: Archive,
    options: BuildOptions,
}

impl ArchiveBuilder {
    /// Creates a builder for `archive` over the directory `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, archive: Archive) -> Self {
        Self {
            root: root.into(),
            archive,
            options: BuildOptions::default(),
        }
    }

    /// Sets the build options.
    #[must_use]
    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Full path of the output container.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.archive.filename)
    }

    /// Builds the archive without a progress indicator.
    ///
    /// # Errors
    ///
    /// See [`ArchiveBuilder::build_with_indicator`].
    pub fn build(&self) -> Result<BuildReport> {
        self.build_with_indicator(NoopRender)
    }

    /// Builds the archive while `render` animates on a background thread.
    ///
    /// The indicator is stopped, and has finished drawing, before this
    /// returns, whether the build succeeded or not.
    ///
    /// # Errors
    ///
    /// - `InvalidCompressionLevel` if the options are invalid
    /// - `ArchiveCreate` if the output file cannot be created; nothing is
    ///   walked in that case
    /// - `Walk` if any file cannot be read or written into the container;
    ///   the walk stops at the first failure
    pub fn build_with_indicator<R: SpinnerRender + 'static>(
        &self,
        render: R,
    ) -> Result<BuildReport> {
        self.options.validate()?;

        let excludes = ExcludeSet::from_entries(self.archive.excludes.iter().cloned());
        let output = self.output_path();
        let mut sink = create_sink(&output, self.archive.format, &self.options)?;
        info!(archive = %self.archive.filename, format = %self.archive.format, "building archive");

        let start = Instant::now();
        let indicator = ProgressIndicator::start(render);

        let mut report = BuildReport::new(self.archive.filename.clone());
        let walked = self.write_entries(sink.as_mut(), &excludes, &mut report);
        // The writer is finished even after a failed walk so whatever was
        // written reaches the disk.
        let finished = sink
            .finish()
            .map_err(|e| PackitError::walk(&self.archive.filename, e));

        indicator.stop();
        walked?;
        finished?;

        report.bytes_compressed = archive_size(&output, &mut report);
        report.duration = start.elapsed();
        info!(
            files = report.files_added,
            bytes = report.bytes_written,
            skipped = report.entries_skipped,
            "archive complete"
        );
        Ok(report)
    }

    fn write_entries(
        &self,
        sink: &mut dyn ContainerSink,
        excludes: &ExcludeSet,
        report: &mut BuildReport,
    ) -> Result<()> {
        let walker = PackWalker::new(&self.root, &self.archive.filename, excludes);

        for item in walker.walk() {
            match item? {
                WalkItem::File(entry) => {
                    let bytes = append_entry(sink, &entry.path, &entry.name)?;
                    debug!(entry = %entry.name, bytes, "added");
                    report.files_added += 1;
                    report.bytes_written += bytes;
                }
                WalkItem::Skipped(entry) => {
                    warn!(entry = %entry.name, "not a regular file, skipped");
                    report.entries_skipped += 1;
                    report.add_warning(format!("Skipped non-regular file: {}", entry.name));
                }
            }
        }

        Ok(())
    }
}

/// Opens one source file and streams it into the container. The handle is
/// closed before the next entry is opened.
fn append_entry(sink: &mut dyn ContainerSink, path: &Path, name: &str) -> Result<u64> {
    let mut file = File::open(path).map_err(|e| PackitError::walk(name, e))?;
    sink.append_file(name, &mut file)
        .map_err(|e| PackitError::walk(name, e))
}

/// Size of the finished archive on disk. A failed `stat` leaves the archive
/// in place, so it is reported as a warning with a size of 0.
fn archive_size(output: &Path, report: &mut BuildReport) -> u64 {
    match fs::metadata(output) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!(archive = %output.display(), "cannot read size of finished archive: {e}");
            report.add_warning(format!("Archive size unknown: {e}"));
            0
        }
    }
}

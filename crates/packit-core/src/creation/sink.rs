//! Container writers.
//!
//! A sink receives one file at a time and streams it into the container.
//! The builder owns the sink exclusively for the whole walk.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::ArchiveFormat;
use crate::PackitError;
use crate::Result;
use crate::creation::config::BuildOptions;
use crate::creation::tar::TarSink;
use crate::creation::zip::ZipSink;

/// Streaming writer for one container format.
pub trait ContainerSink {
    /// Adds a file entry named `name` with the contents of `source`.
    ///
    /// Returns the number of uncompressed bytes copied.
    fn append_file(&mut self, name: &str, source: &mut File) -> io::Result<u64>;

    /// Writes the container trailer and flushes the output.
    fn finish(self: Box<Self>) -> io::Result<()>;

    /// Format this sink produces.
    fn format(&self) -> ArchiveFormat;
}

/// Creates the output file and wraps it in the sink for `format`.
///
/// # Errors
///
/// Returns `ArchiveCreate` if the output file cannot be created.
pub fn create_sink(
    output: &Path,
    format: ArchiveFormat,
    options: &BuildOptions,
) -> Result<Box<dyn ContainerSink>> {
    let file = File::create(output).map_err(|source| PackitError::ArchiveCreate {
        path: output.to_path_buf(),
        source,
    })?;

    let sink: Box<dyn ContainerSink> = match format {
        ArchiveFormat::Zip => Box::new(ZipSink::new(file, options)),
        ArchiveFormat::Tar => Box::new(TarSink::plain(file, options)),
        ArchiveFormat::TarGz => Box::new(TarSink::gzip(file, options)),
    };
    Ok(sink)
}

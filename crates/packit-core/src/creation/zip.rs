//! ZIP container sink.

use std::fs::File;
use std::fs::Metadata;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::Write;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ArchiveFormat;
use crate::creation::config::BuildOptions;
use crate::creation::sink::ContainerSink;

/// Copy buffer size for streaming file contents.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Writes entries into a ZIP container with Deflate compression.
pub struct ZipSink<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    preserve_permissions: bool,
    buffer: Vec<u8>,
}

impl<W: Write + Seek> ZipSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W, options: &BuildOptions) -> Self {
        let level = options.compression_level.unwrap_or(6);
        let file_options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level)));

        Self {
            zip: ZipWriter::new(writer),
            options: file_options,
            preserve_permissions: options.preserve_permissions,
            buffer: vec![0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Writes the central directory and returns the inner writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.zip
            .finish()
            .map_err(|e| io::Error::other(format!("failed to finish ZIP archive: {e}")))
    }

    fn entry_options(&self, metadata: &Metadata) -> SimpleFileOptions {
        let options = self
            .options
            .large_file(metadata.len() >= u64::from(u32::MAX));
        if !self.preserve_permissions {
            return options;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            options.unix_permissions(metadata.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            options
        }
    }
}

impl<W: Write + Seek> ContainerSink for ZipSink<W> {
    fn append_file(&mut self, name: &str, source: &mut File) -> io::Result<u64> {
        let metadata = source.metadata()?;
        let options = self.entry_options(&metadata);

        self.zip
            .start_file(name, options)
            .map_err(|e| io::Error::other(format!("failed to start ZIP entry {name}: {e}")))?;

        let mut bytes_written = 0u64;
        loop {
            let bytes_read = source.read(&mut self.buffer)?;
            if bytes_read == 0 {
                break;
            }
            self.zip.write_all(&self.buffer[..bytes_read])?;
            bytes_written += bytes_read as u64;
        }

        Ok(bytes_written)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut writer = (*self).into_inner()?;
        writer.flush()
    }

    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }
}

//! TAR container sinks (plain and gzip).

use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Write;

use flate2::write::GzEncoder;
use tar::Builder;
use tar::Header;

use crate::ArchiveFormat;
use crate::creation::config::BuildOptions;
use crate::creation::sink::ContainerSink;
use crate::io::CountingReader;

/// Byte stream under the tar builder.
pub enum TarOutput<W: Write> {
    /// Uncompressed tar.
    Plain(W),
    /// Gzip-compressed tar.
    Gzip(GzEncoder<W>),
}

impl<W: Write> TarOutput<W> {
    /// Flushes any compressor state and returns the inner writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(writer) => Ok(writer),
            Self::Gzip(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for TarOutput<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(writer) => writer.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}

/// Writes entries into a tar container.
pub struct TarSink<W: Write> {
    builder: Builder<TarOutput<W>>,
    preserve_permissions: bool,
    format: ArchiveFormat,
}

impl<W: Write> TarSink<W> {
    /// Creates an uncompressed tar sink.
    pub fn plain(writer: W, options: &BuildOptions) -> Self {
        Self::new(TarOutput::Plain(writer), options, ArchiveFormat::Tar)
    }

    /// Creates a gzip-compressed tar sink.
    pub fn gzip(writer: W, options: &BuildOptions) -> Self {
        let level = compression_level_to_flate2(options.compression_level);
        Self::new(
            TarOutput::Gzip(GzEncoder::new(writer, level)),
            options,
            ArchiveFormat::TarGz,
        )
    }

    fn new(output: TarOutput<W>, options: &BuildOptions, format: ArchiveFormat) -> Self {
        Self {
            builder: Builder::new(output),
            preserve_permissions: options.preserve_permissions,
            format,
        }
    }

    /// Writes the tar trailer, finishes compression and returns the inner
    /// writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.builder.into_inner()?.finish()
    }
}

impl<W: Write> ContainerSink for TarSink<W> {
    fn append_file(&mut self, name: &str, source: &mut File) -> io::Result<u64> {
        let metadata = source.metadata()?;
        let size = metadata.len();

        let mut header = Header::new_gnu();
        header.set_size(size);
        set_metadata(&mut header, &metadata, self.preserve_permissions);

        // The header size is fixed up front, so never copy more than that.
        let mut reader = CountingReader::new(source.take(size));
        self.builder.append_data(&mut header, name, &mut reader)?;

        let copied = reader.total_bytes();
        if copied != size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{name} shrank while being archived ({copied} of {size} bytes)"),
            ));
        }
        Ok(copied)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut writer = (*self).into_inner()?;
        writer.flush()
    }

    fn format(&self) -> ArchiveFormat {
        self.format
    }
}

/// Copies mode and mtime into the header.
#[cfg(unix)]
fn set_metadata(header: &mut Header, metadata: &std::fs::Metadata, preserve_permissions: bool) {
    use std::os::unix::fs::MetadataExt;
    if preserve_permissions {
        header.set_mode(metadata.mode() & 0o7777);
        header.set_uid(u64::from(metadata.uid()));
        header.set_gid(u64::from(metadata.gid()));
    } else {
        header.set_mode(0o644);
    }
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_metadata(header: &mut Header, metadata: &std::fs::Metadata, preserve_permissions: bool) {
    let mode = if preserve_permissions && metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    header.set_mode(mode);

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}

/// Converts compression level (1-9) to flate2 compression level.
fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None | Some(6) => flate2::Compression::default(),
        Some(n) => flate2::Compression::new(u32::from(n.clamp(1, 9))),
    }
}

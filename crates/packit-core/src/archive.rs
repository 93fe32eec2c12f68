//! Archive job description and container formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::PackitError;
use crate::Result;

/// Base name used when the working directory has no final component
/// (for example `/`).
const FALLBACK_BASE_NAME: &str = "archive";

/// Supported container formats. Exactly one is produced per build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    /// ZIP archive with Deflate compression.
    #[default]
    Zip,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ArchiveFormat {
    /// File extension appended to the output name, without the leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use packit_core::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::Zip.extension(), "zip");
    /// assert_eq!(ArchiveFormat::TarGz.extension(), "tar.gz");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }

    /// All formats, in the order shown to users.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Zip, Self::Tar, Self::TarGz]
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = PackitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            _ => Err(PackitError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// One build job: where the container goes and what must be left out.
///
/// `filename` is relative to the working directory and is compared against
/// the `/`-separated relative paths produced by the walk, so the container
/// never ends up inside itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Output path, relative to the working directory.
    pub filename: String,
    /// Container format.
    pub format: ArchiveFormat,
    /// Exclude entries in sidecar order. Matching is set membership.
    pub excludes: Vec<String>,
}

impl Archive {
    /// Creates a job for the directory `root`.
    ///
    /// Without `output` the file is named after the directory's base name.
    /// With `output`, every `.` is replaced by `_` before the extension is
    /// appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use packit_core::Archive;
    /// use packit_core::ArchiveFormat;
    /// use std::path::Path;
    ///
    /// let archive = Archive::for_directory(Path::new("/work/site"), None, ArchiveFormat::Zip)?;
    /// assert_eq!(archive.filename, "site.zip");
    ///
    /// let archive =
    ///     Archive::for_directory(Path::new("/work/site"), Some("v1.2"), ArchiveFormat::Tar)?;
    /// assert_eq!(archive.filename, "v1_2.tar");
    /// # Ok::<(), packit_core::PackitError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidOutputName` if `output` is empty or contains a path
    /// separator.
    pub fn for_directory(root: &Path, output: Option<&str>, format: ArchiveFormat) -> Result<Self> {
        let stem = match output {
            Some(name) => sanitize_output_name(name)?,
            None => root
                .file_name()
                .map_or_else(|| FALLBACK_BASE_NAME.to_string(), |n| n.to_string_lossy().into_owned()),
        };

        Ok(Self {
            filename: format!("{stem}.{}", format.extension()),
            format,
            excludes: Vec::new(),
        })
    }

    /// Sets the exclude entries.
    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }
}

fn sanitize_output_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
        return Err(PackitError::InvalidOutputName(name.to_string()));
    }
    Ok(trimmed.replace('.', "_"))
}

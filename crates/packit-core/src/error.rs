//! Error types for archive building and exclude-list operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackitError`.
pub type Result<T> = std::result::Result<T, PackitError>;

/// Errors that can occur while building an archive or editing the exclude
/// list.
#[derive(Error, Debug)]
pub enum PackitError {
    /// The working directory could not be determined.
    #[error("cannot determine the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// The sidecar file exists but could not be read.
    #[error("cannot read exclude file {path}: {source}")]
    SidecarRead {
        /// Path of the sidecar file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The sidecar file could not be created or appended to.
    #[error("cannot write exclude file {path}: {source}")]
    SidecarWrite {
        /// Path of the sidecar file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output container could not be created.
    #[error("cannot create archive {path}: {source}")]
    ArchiveCreate {
        /// Path of the output archive.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file could not be read, or an entry could not be written, during
    /// the walk.
    #[error("failed while archiving {path}: {source}")]
    Walk {
        /// Path being processed when the failure happened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The requested archive format is not known.
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),

    /// The requested output name cannot be used as an archive file name.
    #[error("invalid output name: {0:?}")]
    InvalidOutputName(String),

    /// The compression level is outside 1-9.
    #[error("invalid compression level {level}: expected 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl PackitError {
    pub(crate) fn walk(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }
}

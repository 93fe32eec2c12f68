//! Error conversion utilities for CLI.
//!
//! Converts packit-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use packit_core::ArchiveFormat;
use packit_core::PackitError;

/// Converts `PackitError` to a user-friendly anyhow error with a hint.
pub fn convert_packit_error(err: PackitError) -> anyhow::Error {
    match err {
        PackitError::SidecarRead { path, source } => {
            anyhow!(
                "Cannot read the exclude list '{}': {}\n\
                 HINT: Check that .packit is a readable UTF-8 text file.",
                path.display(),
                source
            )
        }
        PackitError::SidecarWrite { path, source } => {
            anyhow!(
                "Cannot update the exclude list '{}': {}\n\
                 HINT: Check that the current directory is writable.",
                path.display(),
                source
            )
        }
        PackitError::ArchiveCreate { path, source } => {
            anyhow!(
                "Cannot create archive '{}': {}\n\
                 HINT: Check that the current directory is writable.",
                path.display(),
                source
            )
        }
        PackitError::Walk { path, source } => {
            anyhow!(
                "Build aborted while archiving '{}': {}\n\
                 HINT: The partial archive was left in place. Fix the file or leave it out with `packit ignore {}`.",
                path.display(),
                source,
                path.display()
            )
        }
        PackitError::UnsupportedFormat(format) => {
            let supported: Vec<String> = ArchiveFormat::all().iter().map(ToString::to_string).collect();
            anyhow!(
                "Archive format not supported: {format}\n\
                 HINT: Supported formats: {}",
                supported.join(", ")
            )
        }
        PackitError::InvalidOutputName(name) => {
            anyhow!(
                "Invalid output name {name:?}\n\
                 HINT: Pass a plain file name without extension, for example `-o release`."
            )
        }
        _ => anyhow::Error::from(err),
    }
}

/// Converts the error of a core result into an anyhow error with a hint.
pub fn add_packit_context<T>(result: Result<T, PackitError>) -> anyhow::Result<T> {
    result.map_err(convert_packit_error)
}

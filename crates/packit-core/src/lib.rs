//! Directory archiving with a persistent exclude list.
//!
//! `packit-core` packs the current working directory into a single
//! container (zip, tar or tar.gz). Paths listed in the `.packit` sidecar
//! file at the root are left out; an excluded directory is pruned together
//! with everything below it.
//!
//! # Examples
//!
//! ```no_run
//! use packit_core::Archive;
//! use packit_core::ArchiveBuilder;
//! use packit_core::ArchiveFormat;
//! use packit_core::ExcludeStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = std::env::current_dir()?;
//! let store = ExcludeStore::new(&root);
//! store.add(&["target"])?;
//!
//! let archive = Archive::for_directory(&root, None, ArchiveFormat::Zip)?
//!     .with_excludes(store.load()?.into_entries());
//! let report = ArchiveBuilder::new(&root, archive).build()?;
//! println!("Packed {} files into {}", report.files_added, report.archive);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod creation;
pub mod error;
pub mod excludes;
pub mod indicator;
pub mod io;

pub use archive::Archive;
pub use archive::ArchiveFormat;
pub use creation::ArchiveBuilder;
pub use creation::BuildOptions;
pub use creation::BuildReport;
pub use error::PackitError;
pub use error::Result;
pub use excludes::AddOutcome;
pub use excludes::ExcludeSet;
pub use excludes::ExcludeStore;
pub use indicator::CancellationToken;
pub use indicator::NoopRender;
pub use indicator::ProgressIndicator;
pub use indicator::SpinnerRender;

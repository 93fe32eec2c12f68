//! Archive creation.
//!
//! [`ArchiveBuilder`] drives one build: it creates the container, walks
//! the working directory with [`walker::PackWalker`], and streams every
//! kept file into a [`sink::ContainerSink`].

pub mod builder;
pub mod config;
pub mod report;
pub mod sink;
pub mod tar;
pub mod walker;
pub mod zip;

pub use builder::ArchiveBuilder;
pub use config::BuildOptions;
pub use report::BuildReport;
pub use walker::PackEntry;
pub use walker::PackWalker;
pub use walker::WalkItem;

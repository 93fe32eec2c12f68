//! Subcommand implementations.

pub mod build;
pub mod completion;
pub mod ignore;

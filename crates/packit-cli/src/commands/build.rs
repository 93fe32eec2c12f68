//! Build command implementation.

use crate::cli::BuildArgs;
use crate::error::add_packit_context;
use crate::output::OutputFormatter;
use crate::progress::CliSpinner;
use anyhow::Result;
use packit_core::Archive;
use packit_core::ArchiveBuilder;
use packit_core::BuildOptions;
use packit_core::ExcludeStore;
use packit_core::PackitError;
use tracing::debug;

pub fn execute(args: &BuildArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let root = add_packit_context(std::env::current_dir().map_err(PackitError::WorkingDir))?;

    let excludes = add_packit_context(ExcludeStore::new(&root).load())?;
    if !excludes.sidecar_present() {
        formatter.format_info(".packit file does not exist so no file will be ignored");
    }

    let archive = add_packit_context(Archive::for_directory(
        &root,
        args.output.as_deref(),
        args.format,
    ))?
    .with_excludes(excludes.into_entries());
    debug!(?archive, "resolved build job");

    let mut options = BuildOptions::default().with_preserve_permissions(!args.no_permissions);
    if let Some(level) = args.compression_level {
        options = options.with_compression_level(level);
    }

    formatter.format_info("Starting to build the archive");
    let builder = ArchiveBuilder::new(&root, archive).options(options);
    let result = if show_progress && CliSpinner::should_show() {
        builder.build_with_indicator(CliSpinner::new("Building archive"))
    } else {
        builder.build()
    };
    let report = add_packit_context(result)?;

    formatter.format_build_result(&report)
}

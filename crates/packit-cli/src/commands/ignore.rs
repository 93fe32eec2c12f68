//! Ignore command implementation: edits and lists the `.packit` file.

use crate::cli::IgnoreArgs;
use crate::error::add_packit_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use packit_core::ExcludeStore;
use packit_core::PackitError;

pub fn execute(args: &IgnoreArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = add_packit_context(std::env::current_dir().map_err(PackitError::WorkingDir))?;
    let store = ExcludeStore::new(&root);

    if args.list {
        let excludes = add_packit_context(store.load())?;
        if !excludes.sidecar_present() {
            formatter.format_info(".packit file does not exist so no file will be ignored");
        }
        return formatter.format_exclude_list(excludes.entries());
    }

    let outcome = add_packit_context(store.add(&args.paths))?;
    formatter.format_ignore_result(&outcome)
}

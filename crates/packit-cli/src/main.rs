//! Packit CLI - packs the current directory into a single archive, leaving
//! out the paths listed in `.packit`.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!("parsed CLI arguments: {cli:?}");

    let formatter = output::create_formatter(cli.json, cli.verbose > 0, cli.quiet);

    match &cli.command {
        None => formatter.format_banner(&cli::command_summary()),
        Some(cli::Commands::Build(args)) => {
            commands::build::execute(args, &*formatter, !cli.quiet && !cli.json)
        }
        Some(cli::Commands::Ignore(args)) => commands::ignore::execute(args, &*formatter),
        Some(cli::Commands::Completion(args)) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

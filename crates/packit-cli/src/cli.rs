//! CLI argument parsing using clap.

use clap::Command;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use packit_core::ArchiveFormat;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "packit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an archive of the current directory
    Build(BuildArgs),
    /// Add paths to the .packit exclude list, or list it
    Ignore(IgnoreArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Name of the output file relative to the current directory, without
    /// any extension
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Archive format (zip, tar, tar.gz)
    #[arg(short, long, default_value = "zip", value_parser = clap::value_parser!(ArchiveFormat))]
    pub format: ArchiveFormat,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Store entries with default permissions instead of each file's mode
    #[arg(long)]
    pub no_permissions: bool,
}

#[derive(clap::Args, Debug)]
pub struct IgnoreArgs {
    /// List the paths in the exclude list
    #[arg(short, long, conflicts_with = "paths")]
    pub list: bool,

    /// Paths relative to the current directory to leave out of archives
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// One subcommand as shown by the bare `packit` banner.
#[derive(Debug, Serialize)]
pub struct CommandSummary {
    pub name: String,
    pub about: String,
    pub flags: Vec<FlagSummary>,
}

#[derive(Debug, Serialize)]
pub struct FlagSummary {
    pub flag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub help: String,
}

/// Describes every subcommand and its flags from the clap definition.
pub fn command_summary() -> Vec<CommandSummary> {
    Cli::command()
        .get_subcommands()
        .map(summarize_command)
        .collect()
}

fn summarize_command(cmd: &Command) -> CommandSummary {
    let flags = cmd
        .get_arguments()
        .map(|arg| {
            let flag = match (arg.get_short(), arg.get_long()) {
                (Some(short), Some(long)) => format!("-{short}, --{long}"),
                (None, Some(long)) => format!("--{long}"),
                (Some(short), None) => format!("-{short}"),
                (None, None) => format!("<{}>", arg.get_id().as_str().to_uppercase()),
            };
            let default = arg
                .get_default_values()
                .first()
                .map(|v| v.to_string_lossy().into_owned());
            let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
            FlagSummary {
                flag,
                default,
                help,
            }
        })
        .collect();

    CommandSummary {
        name: cmd.get_name().to_string(),
        about: cmd.get_about().map(ToString::to_string).unwrap_or_default(),
        flags,
    }
}

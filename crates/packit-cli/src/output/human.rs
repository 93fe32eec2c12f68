//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::cli::CommandSummary;
use anyhow::Result;
use console::Term;
use console::style;
use packit_core::AddOutcome;
use packit_core::BuildReport;

const LOGO: &str = r" ____            _    _ _
|  _ \ __ _  ___| | _(_) |_
| |_) / _' |/ __| |/ / | __|
|  __/ (_| | (__|   <| | |_
|_|   \__,_|\___|_|\_\_|\__|";

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn write_success(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_banner(&self, commands: &[CommandSummary]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&style(LOGO).cyan().bold().to_string());
        } else {
            let _ = self.term.write_line(LOGO);
        }
        let _ = self.term.write_line("Packit an archive creator");
        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line("Usage: packit <command> [flags] [arguments]");
        let _ = self.term.write_line("");
        let _ = self.term.write_line("Available Commands:");

        for command in commands {
            let _ = self.term.write_line("");
            let name = format!("packit {}", command.name);
            if self.use_colors {
                let _ = self.term.write_line(&format!(
                    " {}  {}",
                    style(name).bold(),
                    command.about
                ));
            } else {
                let _ = self.term.write_line(&format!(" {name}  {}", command.about));
            }

            for flag in &command.flags {
                let line = match &flag.default {
                    Some(default) => {
                        format!("    {:<28} {} (default: {default})", flag.flag, flag.help)
                    }
                    None => format!("    {:<28} {}", flag.flag, flag.help),
                };
                let _ = self.term.write_line(&line);
            }
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line("Adding files to ignore:");
        let _ = self.term.write_line("    packit ignore file1 file2 file3");

        Ok(())
    }

    fn format_build_result(&self, report: &BuildReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_success(&format!("Archive created: {}", report.archive));

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));

        if report.bytes_compressed > 0 {
            let _ = self.term.write_line(&format!(
                "  Archive size:     {}",
                Self::format_size(report.bytes_compressed)
            ));
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }

        if report.entries_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Entries skipped:  {}", report.entries_skipped));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.term.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.term.write_line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_ignore_result(&self, outcome: &AddOutcome) -> Result<()> {
        if outcome.is_unchanged() {
            self.format_warning("Nothing to add to ignore list");
            return Ok(());
        }
        if self.quiet {
            return Ok(());
        }

        for entry in &outcome.added {
            let _ = self.term.write_line(&format!("  + {entry}"));
        }
        self.write_success("Added to the .packit file");
        Ok(())
    }

    fn format_exclude_list(&self, entries: &[String]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.format_info("List of excludes are:");
        for entry in entries {
            let _ = self.term.write_line(entry);
        }
        Ok(())
    }

    fn format_info(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self.term.write_line(&style(message).blue().to_string());
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

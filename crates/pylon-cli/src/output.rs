//! Terminal output for command results and status lines.
//!
//! Results go to stdout and are never silenced. Status lines go to stdout
//! and respect `--quiet`; problems go to stderr.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Symbol and colour of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Warning,
    Failure,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Failure => "\u{2717}",
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    stdout: Term,
    stderr: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };
        let color = format == OutputFormat::Human && !args.no_color && !config.output.no_color;

        Self {
            format,
            quiet: args.quiet,
            color,
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// A command result.
    pub fn emit(&self, text: &str) -> io::Result<()> {
        self.stdout.write_line(text)
    }

    /// Progress chatter; dropped under `--quiet`.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_line(&self.status_line(Status::Success, msg))
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stderr.write_line(&self.status_line(Status::Warning, msg))
    }

    /// Shown even under `--quiet`.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        self.stderr.write_line(&self.status_line(Status::Failure, msg))
    }

    pub fn supports_color(&self) -> bool {
        self.color
    }

    /// The resolved format, never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn status_line(&self, status: Status, msg: &str) -> String {
        let symbol = status.symbol();
        if !self.color {
            return format!("{symbol} {msg}");
        }
        match status {
            Status::Success => format!("{} {}", symbol.green().bold(), msg.green()),
            Status::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            Status::Failure => format!("{} {}", symbol.red().bold(), msg.red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(quiet: bool, no_color: bool, output_format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            log_file: None,
            output_format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn writes_succeed_in_quiet_mode() {
        let out = manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.emit("result").is_ok());
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn color_only_for_human_format() {
        assert!(manager(false, false, OutputFormat::Human).supports_color());
        assert!(!manager(false, true, OutputFormat::Human).supports_color());
        assert!(!manager(false, false, OutputFormat::Plain).supports_color());
        assert!(!manager(false, false, OutputFormat::Json).supports_color());
    }

    #[test]
    fn plain_status_lines_have_symbols() {
        let out = manager(false, true, OutputFormat::Plain);
        assert_eq!(out.status_line(Status::Success, "done"), "\u{2713} done");
        assert_eq!(out.status_line(Status::Failure, "x"), "\u{2717} x");
    }

    #[test]
    fn format_is_resolved() {
        assert_eq!(manager(false, false, OutputFormat::Json).format(), OutputFormat::Json);
    }
}

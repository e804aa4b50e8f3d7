//! Error handling for the Pylon CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use pylon_core::error::PylonError;

// Re-export so callers only need `use crate::error::*`.
pub use pylon_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request event is not JSON.
    #[error("Invalid event from {origin}")]
    InvalidEvent {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The template directory does not exist.
    #[error("Template directory not found: {}", path.display())]
    TemplatesNotFound { path: PathBuf },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `pylon-core`.
    #[error("{0}")]
    Core(#[from] PylonError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::InvalidEvent { source, .. } => vec![
                format!("The event must be a JSON document: {}", source),
                "Example: echo '{\"path\": \"/\"}' | pylon handle".into(),
            ],

            Self::TemplatesNotFound { path } => vec![
                format!("No directory at '{}'", path.display()),
                "Pass the template directory with --templates <DIR>".into(),
                "Or set render.templates_dir in the config file".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Show the effective configuration: pylon config show".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::InvalidEvent { .. } => ErrorCategory::UserError,
            Self::TemplatesNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::Protocol => ErrorCategory::Internal,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Message, causes (when `verbose`) and suggestions, with ANSI styling.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = format!("\n{} {}\n", "\u{2717} Error:".red().bold(), self.red());
        for cause in self.causes().filter(|_| verbose) {
            out.push_str(&format!("  {} {}\n", "caused by:".dimmed(), cause.dimmed()));
        }
        self.push_suggestions(&mut out, "Suggestions:".yellow().bold().to_string());
        if !verbose {
            out.push_str(&format!("\n{}\n", VERBOSE_HINT.dimmed()));
        }
        out
    }

    /// Same layout as [`Self::format_colored`] without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("\nError: {self}\n");
        for cause in self.causes().filter(|_| verbose) {
            out.push_str(&format!("  Caused by: {cause}\n"));
        }
        self.push_suggestions(&mut out, "Suggestions:".to_string());
        if !verbose {
            out.push_str(&format!("\n{VERBOSE_HINT}\n"));
        }
        out
    }

    /// The source chain, outermost first.
    fn causes(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::successors(self.source(), |&err: &&(dyn std::error::Error + 'static)| err.source()).map(ToString::to_string)
    }

    fn push_suggestions(&self, out: &mut String, heading: String) {
        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return;
        }
        out.push_str(&format!("\n{heading}\n"));
        for suggestion in suggestions {
            out.push_str(&format!("  {suggestion}\n"));
        }
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

const VERBOSE_HINT: &str = "Use -v / --verbose for more details.";

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Convert foreign error types into [`CliError`] at call-sites with a
/// descriptive context message.
///
/// No blanket impl: it would overlap the concrete ones.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, PylonError> {
    /// Core errors carry their own context; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

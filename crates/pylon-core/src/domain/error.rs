// ============================================================================
// domain/error.rs - VALUE-LEVEL ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (cached initialization failures are replayed)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Protocol Errors (calling-convention violations)
    // ========================================================================
    #[error("Invalid status line '{line}': expected '<code> <reason>'")]
    InvalidStatusLine { line: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid output name '{name}': {reason}")]
    InvalidOutputName { name: String, reason: String },

    #[error("Invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidStatusLine { line } => vec![
                format!("The application sent the status line: {line:?}"),
                "Status lines must start with a code from 100 to 599, e.g. '200 OK'".into(),
            ],
            Self::InvalidOutputName { name, .. } => vec![
                format!("Check the output override for '{name}'"),
                "Output names must be relative file names without '..'".into(),
            ],
            Self::InvalidTemplateName { .. } => {
                vec!["Template names must be relative paths inside the template root".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidStatusLine { .. } => ErrorCategory::Protocol,
            Self::InvalidOutputName { .. } | Self::InvalidTemplateName { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Protocol,
}

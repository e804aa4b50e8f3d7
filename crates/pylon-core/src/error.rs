//! Unified error handling for Pylon Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Pylon Core operations.
///
/// Request handling never surfaces this type to a host; it is returned by the
/// batch and setup paths (static rendering, filesystem, configuration).
#[derive(Debug, Error, Clone)]
pub enum PylonError {
    /// Errors from the domain layer (invalid values).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl PylonError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Pylon".into(),
                "Please report this issue at: https://github.com/cosecruz/pylon/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Protocol => ErrorCategory::Protocol,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Protocol,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type PylonResult<T> = Result<T, PylonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_category() {
        let err: PylonError = DomainError::InvalidStatusLine {
            line: "abc".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }

    #[test]
    fn configuration_suggestions_echo_message() {
        let err = PylonError::Configuration {
            message: "missing template_dir".into(),
        };
        assert!(err.suggestions()[0].contains("missing template_dir"));
    }
}

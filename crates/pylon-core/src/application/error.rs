//! Application layer errors.
//!
//! These errors represent failures in orchestration, not invalid values.
//! Value errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The application callable could not be constructed.
    #[error("Application failed to initialize: {reason}")]
    Initialization { reason: String },

    /// The application callable failed while handling a request.
    #[error("Application failed: {reason}")]
    ApplicationFailed { reason: String },

    /// The application broke the calling convention.
    #[error("Protocol violation: {0}")]
    Protocol(#[from] DomainError),

    /// Template rendering failed.
    #[error("Rendering '{template}' failed: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Template does not exist in the renderer's catalog.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared adapter state could not be locked (poisoned).
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Initialization { reason } => vec![
                format!("Initialization failed: {}", reason),
                "Check gateway.settings.module and gateway.settings.values".into(),
                "The failure is cached until the process restarts".into(),
            ],
            Self::TemplateNotFound { name } => vec![
                format!("No template named '{}'", name),
                "Check --templates points at the right directory".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Fix the template syntax in '{}'", template),
                "Supported tags: include, load; variables render empty".into(),
            ],
            Self::StoreLockError => vec![
                "A previous operation panicked while holding adapter state".into(),
                "Try again in a moment".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Initialization { .. } => ErrorCategory::Configuration,
            Self::ApplicationFailed { .. } | Self::Protocol(_) => ErrorCategory::Protocol,
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

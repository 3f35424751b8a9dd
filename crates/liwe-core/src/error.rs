//! Unified error handling for LiWE Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for LiWE Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LiweError {
    /// Errors from the domain layer (rendering and validation).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (provisioning failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl LiweError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in liwe3".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
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
    NotFound,
    Configuration,
    /// A subprocess the run depends on failed.
    External,
    Internal,
}

/// Convenient result type alias.
pub type LiweResult<T> = Result<T, LiweError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn domain_validation_maps_to_validation() {
        let err: LiweError = DomainError::UnsupportedPackageManager { name: "bun".into() }.into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions().iter().any(|s| s.contains("pnpm")));
    }

    #[test]
    fn external_failure_is_its_own_category() {
        let err: LiweError = ApplicationError::ExternalCommandFailure {
            command: "git submodule add".into(),
            reason: "exit status: 128".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::External);
    }

    #[test]
    fn backup_collision_message_names_both_paths() {
        let err: LiweError = ApplicationError::BackupCollision {
            path: PathBuf::from("a/.env"),
            backup: PathBuf::from("a/.env.old"),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("a/.env.old"));
        assert!(msg.contains("a/.env"));
    }
}

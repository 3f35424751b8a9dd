//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while provisioning a project.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The run cannot start from the current on-disk state.
    #[error("Precondition failed for {path}: {reason}")]
    PreconditionViolation { path: PathBuf, reason: String },

    /// A package manager, generator or git subprocess failed.
    #[error("Command `{command}` failed: {reason}")]
    ExternalCommandFailure { command: String, reason: String },

    /// A forced write found a previous backup in the way.
    #[error("Refusing to overwrite {path}: backup {backup} already exists")]
    BackupCollision { path: PathBuf, backup: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// `package.json` could not be parsed or updated.
    #[error("Invalid package manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    /// A built-in template is missing from the store.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,
}

impl ApplicationError {
    pub fn precondition(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PreconditionViolation { path, .. } => vec![
                format!("Check the project location: {}", path.display()),
                "Use 'liwe3 create' for a new directory, 'liwe3 init' inside an existing project"
                    .into(),
            ],
            Self::ExternalCommandFailure { command, .. } => vec![
                format!("External command failed: {command}"),
                "Ensure the command is installed and in your PATH".into(),
                "Check the command output above for details".into(),
                "Steps completed before the failure were kept; re-run to resume".into(),
            ],
            Self::BackupCollision { backup, .. } => vec![
                format!("Remove or rename {} and run again", backup.display()),
                "Or run without --force to keep existing files".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ManifestInvalid { path, .. } => vec![
                format!("Fix the JSON in {}", path.display()),
                "The file must contain a JSON object".into(),
            ],
            Self::TemplateNotFound { .. } | Self::StoreLockError => {
                vec!["This is a bug in liwe3, please report it".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PreconditionViolation { .. } => ErrorCategory::Validation,
            Self::BackupCollision { .. } => ErrorCategory::Validation,
            Self::ManifestInvalid { .. } => ErrorCategory::Validation,
            Self::ExternalCommandFailure { .. } => ErrorCategory::External,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so a report can keep a copy)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Rendering
    // ========================================================================
    #[error("template references placeholder '%%{name}%%' but no value was supplied")]
    MissingPlaceholder { name: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("unsupported package manager '{name}'")]
    UnsupportedPackageManager { name: String },

    #[error("unknown stack '{name}'")]
    UnknownStack { name: String },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("invalid module name '{name}'")]
    InvalidModuleName { name: String },

    #[error("invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u32 },

    // ========================================================================
    // Plan Violations
    // ========================================================================
    #[error("step '{step}' in phase {phase} follows a step in phase {previous}")]
    PhaseOrder {
        step: String,
        phase: String,
        previous: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingPlaceholder { name } => vec![
                format!("No value was supplied for %%{name}%%"),
                "This is a defect in a built-in template, please report it".into(),
            ],
            Self::UnsupportedPackageManager { name } => vec![
                format!("'{name}' is not a supported package manager"),
                "Supported package managers:".into(),
                "  • npm".into(),
                "  • pnpm".into(),
                "  • yarn".into(),
                "Example: liwe3 create nodejs my-api --pm pnpm".into(),
            ],
            Self::UnknownStack { name } => vec![
                format!("'{name}' is not a supported stack"),
                "Supported stacks:".into(),
                "  • nodejs  - backend service (Express + ArangoDB)".into(),
                "  • svelte  - front-end application (SvelteKit)".into(),
            ],
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{name}' is invalid: {reason}"),
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::InvalidModuleName { name } => vec![
                format!("Module name '{name}' is invalid"),
                "Module names are lowercase letters, digits, '-' and '_'".into(),
                "Example: liwe3 add-module user tag".into(),
            ],
            Self::InvalidPort { .. } => vec!["Choose a port between 1 and 65535".into()],
            Self::PhaseOrder { .. } => {
                vec!["This is a bug in a provisioning plan, please report it".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedPackageManager { .. }
            | Self::UnknownStack { .. }
            | Self::InvalidProjectName { .. }
            | Self::InvalidModuleName { .. }
            | Self::InvalidPort { .. } => ErrorCategory::Validation,
            Self::MissingPlaceholder { .. } | Self::PhaseOrder { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}

//! Error handling for the liwe3 CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use liwe_core::error::LiweError;

pub use liwe_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `liwe-core`.
    #[error("Provisioning failed: {0}")]
    Core(#[from] LiweError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<liwe_core::domain::DomainError> for CliError {
    fn from(err: liwe_core::domain::DomainError) -> Self {
        CliError::Core(err.into())
    }
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        CliError::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Run 'liwe3 config path' to locate the config file".into(),
                "Use 'liwe3 config init' to create a default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
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

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
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

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments, unmet preconditions).
    UserError,
    NotFound,
    Configuration,
    /// Internal/system error, including failed subprocesses.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
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

impl<T> IntoCli<T> for Result<T, LiweError> {
    /// Core errors already carry their own context; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liwe_core::application::ApplicationError;
    use liwe_core::domain::DomainError;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn unsupported_package_manager_is_a_user_error() {
        let err: CliError = DomainError::UnsupportedPackageManager { name: "bun".into() }.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.suggestions().iter().any(|s| s.contains("pnpm")));
    }

    #[test]
    fn existing_directory_is_a_user_error() {
        let err = CliError::Core(
            ApplicationError::precondition("/tmp/shop", "directory already exists").into(),
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn failed_subprocess_exits_with_one() {
        let err = CliError::Core(
            ApplicationError::ExternalCommandFailure {
                command: "git submodule add".into(),
                reason: "exit status: 128".into(),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 1);
        assert!(err.suggestions().iter().any(|s| s.contains("re-run")));
    }

    #[test]
    fn backup_collision_suggests_removing_the_backup() {
        let err = CliError::Core(
            ApplicationError::BackupCollision {
                path: PathBuf::from("app/.env"),
                backup: PathBuf::from("app/.env.old"),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.suggestions().iter().any(|s| s.contains(".env.old")));
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(CliError::config("bad toml").exit_code(), 4);
    }

    #[test]
    fn exit_code_internal_for_io() {
        let err: CliError = io::Error::other("disk on fire").into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn cancelled_is_a_user_error() {
        assert_eq!(CliError::Cancelled.exit_code(), 2);
    }

    #[test]
    fn plain_format_has_no_ansi_codes() {
        let out = CliError::config("missing section").format_plain(false);
        assert!(out.contains("Error: Configuration error: missing section"));
        assert!(out.contains("Suggestions:"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn verbose_plain_format_includes_cause_chain() {
        let result: io::Result<()> = Err(io::Error::other("root cause"));
        let err = result
            .with_cli_context(|| "writing config")
            .unwrap_err();
        let out = err.format_plain(true);
        assert!(out.contains("writing config"));
        assert!(out.contains("Caused by: root cause"));
        assert!(!out.contains("--verbose"));
    }

    #[test]
    fn core_context_passes_through() {
        let result: Result<(), LiweError> = Err(LiweError::Internal {
            message: "boom".into(),
        });
        let err = result.with_cli_context(|| "ignored").unwrap_err();
        assert!(matches!(err, CliError::Core(LiweError::Internal { .. })));
    }
}

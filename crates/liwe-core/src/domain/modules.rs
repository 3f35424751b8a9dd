//! External module references (git submodules).

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// A linked, separately versioned component attached under a fixed alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    source: String,
    alias: PathBuf,
}

impl ModuleRef {
    /// `alias` is relative to the project root.
    pub fn new(source: impl Into<String>, alias: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            alias: alias.into(),
        }
    }

    /// Remote location passed to `git submodule add`.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Path of the checkout, relative to the project root.
    pub fn alias(&self) -> &Path {
        &self.alias
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.alias.display())
    }
}

/// Check a feature-module name: lowercase ASCII letters, digits, `-`, `_`.
pub fn validate_module_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidModuleName {
            name: name.to_string(),
        })
    }
}

/// Join a remote base (`git@github.com:owner`, `https://host/owner/`) and a
/// repository name.
pub fn remote_url(base: &str, repository: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), repository)
}

//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `liwe-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{ModuleRef, Template, TemplateId};
use crate::error::LiweResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `liwe_adapters::filesystem::LocalFilesystem` (production)
/// - `liwe_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths handed to the port are always absolute or rooted at the project
/// root; the port never consults the process working directory on its own.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> LiweResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> LiweResult<String>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> LiweResult<()>;

    /// Move a file; the destination must not exist.
    fn rename(&self, from: &Path, to: &Path) -> LiweResult<()>;
}

/// A single external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory of the child process.
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Port for running package managers and project generators.
///
/// Implemented by:
/// - `liwe_adapters::process::SystemCommandRunner` (production)
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run to completion; a non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> LiweResult<()>;
}

/// Port for version control.
///
/// Implemented by:
/// - `liwe_adapters::vcs::GitCli` (production)
/// - `liwe_adapters::vcs::MemoryVersionControl` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Whether `root` is inside a work tree.
    fn is_repository(&self, root: &Path) -> bool;

    /// Create a repository at `root`.
    fn init(&self, root: &Path) -> LiweResult<()>;

    /// Register `module` as a submodule of the repository at `root`.
    fn add_submodule(&self, root: &Path, module: &ModuleRef) -> LiweResult<()>;
}

/// Port for random secrets.
#[cfg_attr(test, mockall::automock)]
pub trait SecretSource: Send + Sync {
    /// A fresh alphanumeric string of `len` characters.
    fn generate(&self, len: usize) -> String;
}

/// Port for template retrieval.
///
/// Implemented by:
/// - `liwe_adapters::template_store::BuiltinTemplates` (compiled-in assets)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Get a specific template by ID.
    fn get(&self, id: TemplateId) -> LiweResult<Template>;

    /// List all available templates.
    fn list(&self) -> LiweResult<Vec<Template>>;
}

//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use liwe_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{LiweError, LiweResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> LiweResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_to_string(&self, path: &Path) -> LiweResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> LiweResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> LiweResult<()> {
        // std::fs::rename silently replaces an existing file on Unix.
        if to.exists() {
            return Err(map_io_error(
                to,
                io::Error::from(io::ErrorKind::AlreadyExists),
                "rename onto",
            ));
        }
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> LiweError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

//! Infrastructure adapters for liwe3.
//!
//! This crate implements the ports defined in `liwe-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod process;
pub mod secrets;
pub mod template_store;
pub mod vcs;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::SystemCommandRunner;
pub use secrets::RandomSecrets;
pub use template_store::BuiltinTemplates;
pub use vcs::{GitCli, MemoryVersionControl};

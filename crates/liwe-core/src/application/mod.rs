//! Application layer for LiWE provisioning.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ProvisionService)
//! - **Ports**: Interface definitions (traits) for disk, processes and git
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Rendering and planning rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{ProvisionRequest, ProvisionService, RunMode};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandRunner, Filesystem, Invocation, SecretSource, TemplateStore, VersionControl,
};

pub use error::ApplicationError;

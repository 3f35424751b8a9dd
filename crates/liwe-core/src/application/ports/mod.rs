//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `liwe-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `CommandRunner`: Package managers and generators
//!   - `VersionControl`: Repository checks and submodules
//!   - `SecretSource`: Random tokens for the runtime configuration
//!   - `TemplateStore`: Built-in template retrieval
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CommandRunner, Filesystem, Invocation, SecretSource, TemplateStore, VersionControl,
};

#[cfg(test)]
pub use output::{
    MockCommandRunner, MockFilesystem, MockSecretSource, MockTemplateStore, MockVersionControl,
};

//! LiWE Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the `liwe3`
//! project provisioner, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            liwe-cli (CLI)               │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │           (ProvisionService)            │
//! │   create / init / add-module flows      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  (Filesystem, CommandRunner, VCS, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      liwe-adapters (Infrastructure)     │
//! │ (LocalFilesystem, GitCli, Builtin...)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (render, StackProfile, ProvisionPlan)  │
//! │         No I/O of its own               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use liwe_core::{
//!     application::{ProvisionRequest, ProvisionService},
//!     domain::{PackageManager, ProjectName, Stack},
//! };
//!
//! // 1. Describe the run
//! let request = ProvisionRequest::new(Stack::Backend, ProjectName::new("shop")?, "/work/shop")
//!     .with_package_manager(PackageManager::Pnpm);
//!
//! // 2. Use application service (with injected adapters)
//! let service = ProvisionService::new(store, filesystem, runner, vcs, secrets);
//! let report = service.create(&request)?;
//! ```

// Pure rendering, value objects and plans
pub mod domain;

// Orchestration and ports
pub mod application;

// Root error type
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ProvisionRequest, ProvisionService, RunMode,
        ports::{
            CommandRunner, Filesystem, Invocation, SecretSource, TemplateStore, VersionControl,
        },
    };
    pub use crate::domain::{
        ModuleRef, PackageManager, Port, ProjectName, ProvisionPlan, ProvisionReport, Stack,
        StepOutcome, Substitutions, Template, TemplateId, render,
    };
    pub use crate::error::{LiweError, LiweResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a project" or "attach modules".

pub mod provision_service;

pub use provision_service::{ProvisionRequest, ProvisionService, RunMode};

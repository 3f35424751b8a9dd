// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for LiWE provisioning.
//!
//! This module contains pure logic with no I/O. Disk, process and version
//! control access are handled via ports (traits) defined in the application
//! layer.
//!
//! - **No async**: everything runs sequentially
//! - **No I/O**: rendering and planning never touch the filesystem
//! - **Closed sets**: stacks and package managers are enums, parsed once
pub mod error;
pub mod modules;
pub mod plan;
pub mod stacks;
pub mod template;
pub mod value_objects;

pub use error::{DomainError, ErrorCategory};
pub use modules::{ModuleRef, remote_url, validate_module_name};
pub use plan::{
    BACKUP_SUFFIX, Phase, PlannedStep, ProvisionPlan, ProvisionReport, Step, StepOutcome,
    StepReport, WritePolicy, backup_path,
};
pub use stacks::{DEFAULT_REMOTE_BASE, GeneratedFile, StackProfile, profile};
pub use template::{Substitutions, Template, TemplateId, placeholders, render};
pub use value_objects::{PackageManager, Port, ProjectName, Stack};

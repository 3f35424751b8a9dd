//! `liwe3 add-module` - attach feature modules to an existing project.

use tracing::instrument;

use super::{build_service, resolve_root};
use crate::{
    cli::{AddModuleArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(modules = ?args.modules))]
pub fn execute(
    args: AddModuleArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let root = resolve_root(args.path.as_deref())?;
    let service = build_service(global, config);
    let stack = service.detect_stack(&root)?;

    output.header(&format!(
        "Adding {} module(s) to {stack} project",
        args.modules.len()
    ))?;

    let report = service.add_modules(stack, &root, &args.modules, &config.modules.remote_base)?;
    output.report(&report)?;

    Ok(())
}

//! `liwe3 create` - make a new project directory and provision it.

use std::path::Path;

use tracing::instrument;

use liwe_core::{
    application::ProvisionRequest,
    domain::{DomainError, ProjectName, Stack},
};

use super::{build_service, confirm_overwrite, resolve_package_manager, resolve_port, resolve_root};
use crate::{
    cli::{CreateArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(stack = ?args.stack, name = %args.name))]
pub fn execute(
    args: CreateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    // Resolved first so a bad flag fails before anything touches the disk.
    let package_manager = resolve_package_manager(global, config, None)?;
    let port = resolve_port(global, config)?;

    let stack = Stack::from(args.stack);
    let project_name = project_name_from(&args.name)?;
    let root = resolve_root(Some(Path::new(&args.name)))?;

    confirm_overwrite(&args.overwrite, &root, output)?;

    output.header(&format!(
        "Creating {stack} project '{project_name}' with {package_manager}"
    ))?;

    let request = ProvisionRequest::new(stack, project_name, &root)
        .with_port(port)
        .with_package_manager(package_manager)
        .with_force(args.overwrite.force)
        .with_remote_base(config.modules.remote_base.as_str());

    let report = build_service(global, config).create(&request)?;
    output.report(&report)?;

    output.print("")?;
    output.success(&format!("Project ready at {}", root.display()))?;
    output.info("Next steps:")?;
    output.print(&format!("  cd {}", args.name))?;
    output.print(&format!(
        "  {} {}",
        package_manager.program(),
        package_manager.run_script_args("dev").join(" ")
    ))?;

    Ok(())
}

/// The leaf component of a name-or-path argument.
fn project_name_from(arg: &str) -> Result<ProjectName, DomainError> {
    let leaf = Path::new(arg)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string());
    ProjectName::new(leaf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_is_the_project_name() {
        assert_eq!(project_name_from("shop").unwrap().as_str(), "shop");
    }

    #[test]
    fn path_uses_its_last_component() {
        assert_eq!(
            project_name_from("../services/billing").unwrap().as_str(),
            "billing"
        );
    }

    #[test]
    fn parent_reference_is_rejected() {
        assert!(project_name_from("..").is_err());
    }
}

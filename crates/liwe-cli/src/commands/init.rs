//! `liwe3 init` - provision an existing project in place.

use tracing::instrument;

use liwe_core::{application::ProvisionRequest, domain::ProjectName};

use super::{build_service, confirm_overwrite, resolve_package_manager, resolve_port, resolve_root};
use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: InitArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let root = resolve_root(args.path.as_deref())?;
    let service = build_service(global, config);

    let package_manager =
        resolve_package_manager(global, config, service.detect_package_manager(&root))?;
    let port = resolve_port(global, config)?;
    let stack = service.detect_stack(&root)?;

    let dir_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("'{}' has no directory name", root.display()),
            source: None,
        })?;
    let project_name = ProjectName::new(dir_name)?;

    confirm_overwrite(&args.overwrite, &root, output)?;

    output.header(&format!(
        "Initialising {stack} project '{project_name}' with {package_manager}"
    ))?;

    let request = ProvisionRequest::new(stack, project_name, &root)
        .with_port(port)
        .with_package_manager(package_manager)
        .with_force(args.overwrite.force)
        .with_remote_base(config.modules.remote_base.as_str());

    let report = service.init(&request)?;
    output.report(&report)?;

    if report.applied() == 0 {
        output.success("Project already up to date")?;
    } else {
        output.success(&format!("Project initialised at {}", root.display()))?;
    }

    Ok(())
}

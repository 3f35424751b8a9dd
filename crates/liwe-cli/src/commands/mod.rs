//! Command handlers and the adapter wiring they share.

pub mod add_module;
pub mod completions;
pub mod config;
pub mod create;
pub mod init;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use liwe_adapters::{BuiltinTemplates, GitCli, LocalFilesystem, RandomSecrets, SystemCommandRunner};
use liwe_core::{
    application::ProvisionService,
    domain::{PackageManager, Port},
};
use tracing::debug;

use crate::{
    cli::{GlobalArgs, OverwriteArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Wire the production adapters into a [`ProvisionService`].
pub(crate) fn build_service(global: &GlobalArgs, config: &AppConfig) -> ProvisionService {
    let mut templates = BuiltinTemplates::new();
    if let Some(dir) = config.templates_dir() {
        debug!(dir = %dir.display(), "Using template overrides");
        templates = templates.with_override_dir(dir);
    }

    let runner = SystemCommandRunner::new().quiet(global.quiet);

    ProvisionService::new(
        Box::new(templates),
        Box::new(LocalFilesystem::new()),
        Box::new(runner),
        Box::new(GitCli::with_runner(runner)),
        Box::new(RandomSecrets::new()),
    )
}

/// `--pm` flag, then config, then the lockfile hint, then pnpm.
pub(crate) fn resolve_package_manager(
    global: &GlobalArgs,
    config: &AppConfig,
    detected: Option<PackageManager>,
) -> CliResult<PackageManager> {
    if let Some(name) = &global.pm {
        return Ok(PackageManager::from_str(name)?);
    }
    if let Some(pm) = config.package_manager()? {
        return Ok(pm);
    }
    Ok(detected.unwrap_or_default())
}

/// `-p` flag, else config.
pub(crate) fn resolve_port(global: &GlobalArgs, config: &AppConfig) -> CliResult<Port> {
    match global.node_server_port {
        Some(port) => Ok(Port::new(port)?),
        None => config.port(),
    }
}

/// Absolute project root for `--path`, defaulting to the working directory.
pub(crate) fn resolve_root(path: Option<&Path>) -> CliResult<PathBuf> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read current directory")?;
    Ok(match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd,
    })
}

/// Ask before a forced run rewrites files. Non-interactive sessions proceed.
pub(crate) fn confirm_overwrite(
    args: &OverwriteArgs,
    root: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    if !args.force || args.yes {
        return Ok(());
    }
    output.warning(&format!(
        "--force backs up and rewrites generated files in {}",
        root.display()
    ))?;

    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) || output.is_quiet() {
        return Ok(());
    }

    if prompt("Continue?")? {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(feature = "interactive")]
fn prompt(question: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "Failed to read confirmation".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn prompt(question: &str) -> CliResult<bool> {
    use std::io::Write as _;

    print!("{question} [y/N] ");
    std::io::stdout()
        .flush()
        .with_cli_context(|| "Failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .with_cli_context(|| "Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

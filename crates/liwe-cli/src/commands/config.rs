//! `liwe3 config` - inspect and create the configuration file.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&to_toml(config)?)?;
        }

        ConfigCommands::Path => {
            let path = global.config.clone().unwrap_or_else(AppConfig::config_path);
            output.print(&path.display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            let path = global.config.clone().unwrap_or_else(AppConfig::config_path);

            if path.exists() && !force {
                output.warning(&format!(
                    "Config already exists at {}  (use --force to overwrite)",
                    path.display(),
                ))?;
                return Ok(());
            }

            let text = to_toml(&AppConfig::default())?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_cli_context(|| {
                    format!("Failed to create config directory '{}'", parent.display())
                })?;
            }
            std::fs::write(&path, text).with_cli_context(|| {
                format!("Failed to write config to '{}'", path.display())
            })?;

            output.success(&format!("Configuration created at {}", path.display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let display = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    };

    match key {
        "defaults.package_manager" => Ok(config.defaults.package_manager.clone().unwrap_or_default()),
        "defaults.port" => Ok(config.defaults.port.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        "modules.remote_base" => Ok(config.modules.remote_base.clone()),
        "templates.dir" => Ok(display(&config.templates.dir)),
        _ => Err(CliError::config(format!("Unknown config key: '{key}'"))),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `LIWE_<SECTION>__<KEY>`, e.g. `LIWE_DEFAULTS__PORT`
//! 3. Config file (`--config`, or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use liwe_core::domain::{DEFAULT_REMOTE_BASE, PackageManager, Port};

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for provisioning runs.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Where LiWE module repositories live.
    pub modules: ModulesConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Used when `--pm` is absent and no lockfile is found.
    pub package_manager: Option<String>,
    pub port: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Prefix for submodule URLs, `<remote_base>/<repository>.git`.
    pub remote_base: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose files replace built-in templates of the same name.
    pub dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            package_manager: None,
            port: u32::from(Port::DEFAULT),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            remote_base: DEFAULT_REMOTE_BASE.into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to build default configuration")?;

        let file = match config_file {
            Some(path) => File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let config: Self = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix("LIWE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.liwe3.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "fsoft72", "liwe3")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".liwe3.toml"))
    }

    /// The configured package manager, if any.
    pub fn package_manager(&self) -> CliResult<Option<PackageManager>> {
        self.defaults
            .package_manager
            .as_deref()
            .map(PackageManager::from_str)
            .transpose()
            .map_err(|e| CliError::ConfigError {
                message: format!("defaults.package_manager: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// The configured server port.
    pub fn port(&self) -> CliResult<Port> {
        Port::new(self.defaults.port).map_err(|e| CliError::ConfigError {
            message: format!("defaults.port: {e}"),
            source: Some(Box::new(e)),
        })
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates.dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_port_is_12000() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.port, 12000);
        assert_eq!(cfg.port().unwrap(), Port::DEFAULT);
    }

    #[test]
    fn default_remote_base_is_the_liwe_organisation() {
        assert_eq!(AppConfig::default().modules.remote_base, DEFAULT_REMOTE_BASE);
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            "[defaults]\nport = 14000\npackage_manager = \"yarn\"\n\n\
             [modules]\nremote_base = \"https://git.example.com/liwe\"\n",
        );
        let path = file.path().to_path_buf();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.defaults.port, 14000);
        assert_eq!(cfg.package_manager().unwrap(), Some(PackageManager::Yarn));
        assert_eq!(cfg.modules.remote_base, "https://git.example.com/liwe");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.output, OutputConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/liwe3.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("[defaults\nport = ");
        let path = file.path().to_path_buf();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn unsupported_package_manager_is_a_config_error() {
        let mut cfg = AppConfig::default();
        cfg.defaults.package_manager = Some("bun".into());
        assert!(matches!(
            cfg.package_manager(),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn zero_port_is_a_config_error() {
        let mut cfg = AppConfig::default();
        cfg.defaults.port = 0;
        assert!(matches!(cfg.port(), Err(CliError::ConfigError { .. })));
    }

    #[test]
    fn serialises_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[defaults]"));
        assert!(text.contains("port = 12000"));
        assert!(text.contains("remote_base"));
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}

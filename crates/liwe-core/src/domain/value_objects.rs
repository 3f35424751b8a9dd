//! Domain value objects: Stack, PackageManager, ProjectName, Port.
//!
//! These are pure value types with equality-by-value and `FromStr` parsers
//! that reject anything outside the closed set. Resolution happens once at
//! startup; nothing downstream string-matches on names again.

use crate::domain::error::DomainError;
use std::fmt;
use std::str::FromStr;

// ── Stack ────────────────────────────────────────────────────────────────────

/// The project flavour being provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stack {
    /// Node.js backend service.
    Backend,
    /// SvelteKit front-end application.
    Frontend,
}

impl Stack {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "nodejs",
            Self::Frontend => "svelte",
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stack {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nodejs" | "node" | "backend" => Ok(Self::Backend),
            "svelte" | "sveltekit" | "frontend" => Ok(Self::Frontend),
            other => Err(DomainError::UnknownStack {
                name: other.to_string(),
            }),
        }
    }
}

// ── PackageManager ───────────────────────────────────────────────────────────

/// A supported JavaScript package manager.
///
/// Each variant knows its own command conventions, so callers never build
/// command lines from a manager name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    #[default]
    Pnpm,
    Yarn,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [Self::Npm, Self::Pnpm, Self::Yarn];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
        }
    }

    /// Executable name.
    pub const fn program(&self) -> &'static str {
        self.as_str()
    }

    /// Lockfile whose presence identifies this manager.
    pub const fn lockfile(&self) -> &'static str {
        match self {
            Self::Npm => "package-lock.json",
            Self::Pnpm => "pnpm-lock.yaml",
            Self::Yarn => "yarn.lock",
        }
    }

    /// Arguments for "add these packages [as dev dependencies]".
    pub fn add_args(&self, packages: &[String], dev: bool) -> Vec<String> {
        let (verb, dev_flag) = match self {
            Self::Npm => ("install", "--save-dev"),
            Self::Pnpm | Self::Yarn => ("add", "-D"),
        };

        let mut args = vec![verb.to_string()];
        if dev {
            args.push(dev_flag.to_string());
        }
        args.extend(packages.iter().cloned());
        args.push("--silent".to_string());
        args
    }

    /// Arguments for "run this named script".
    pub fn run_script_args(&self, script: &str) -> Vec<String> {
        match self {
            Self::Npm => vec!["run".into(), script.into()],
            Self::Pnpm | Self::Yarn => vec![script.into()],
        }
    }

    /// Arguments that create a fresh `package.json` without prompting.
    pub fn init_args(&self) -> Vec<String> {
        match self {
            Self::Npm | Self::Yarn => vec!["init".into(), "-y".into()],
            Self::Pnpm => vec!["init".into()],
        }
    }

    /// Program and arguments that execute a package binary without
    /// installing it (`npx`, `pnpm dlx`, `yarn dlx`).
    pub fn exec_command(&self, tool_args: &[&str]) -> (&'static str, Vec<String>) {
        let (program, mut args): (&'static str, Vec<String>) = match self {
            Self::Npm => ("npx", Vec::new()),
            Self::Pnpm => ("pnpm", vec!["dlx".into()]),
            Self::Yarn => ("yarn", vec!["dlx".into()]),
        };
        args.extend(tool_args.iter().map(|a| a.to_string()));
        (program, args)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            _ => Err(DomainError::UnsupportedPackageManager {
                name: s.to_string(),
            }),
        }
    }
}

// ── ProjectName ──────────────────────────────────────────────────────────────

/// A validated project name: the leaf directory name of the project root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidProjectName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(invalid("name cannot contain whitespace"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Database name derived from the project name.
    pub fn database_name(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Port ─────────────────────────────────────────────────────────────────────

/// Network port of the backend server. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port(u16);

impl Port {
    pub const DEFAULT: Port = Port(12000);

    pub fn new(port: u32) -> Result<Self, DomainError> {
        match u16::try_from(port) {
            Ok(p) if p > 0 => Ok(Self(p)),
            _ => Err(DomainError::InvalidPort { port }),
        }
    }

    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Port> for u32 {
    fn from(port: Port) -> Self {
        u32::from(port.0)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

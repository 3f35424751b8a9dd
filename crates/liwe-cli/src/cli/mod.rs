//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use liwe_core::domain::Stack;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "liwe3",
    bin_name = "liwe3",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "LiWE3 project provisioner",
    long_about = "liwe3 creates and initialises LiWE Node.js backends and SvelteKit \
                  front-ends: it installs packages, renders configuration files and \
                  attaches the LiWE modules as git submodules.",
    after_help = "EXAMPLES:\n\
        \x20 liwe3 create nodejs my-api\n\
        \x20 liwe3 --pm npm -p 13000 create svelte my-site\n\
        \x20 liwe3 init --path ./legacy-api\n\
        \x20 liwe3 add-module invoice product\n\
        \x20 liwe3 completions bash > /usr/share/bash-completion/completions/liwe3",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project directory and provision it.
    #[command(
        visible_alias = "new",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 liwe3 create nodejs my-api\n\
            \x20 liwe3 create svelte my-site --pm npm\n\
            \x20 liwe3 create backend ../services/billing"
    )]
    Create(CreateArgs),

    /// Provision an existing Node project in place.
    #[command(
        about = "Initialise an existing project",
        after_help = "EXAMPLES:\n\
            \x20 liwe3 init                 # current directory\n\
            \x20 liwe3 init --path ../api\n\
            \x20 liwe3 init --force --yes   # back up and rewrite generated files"
    )]
    Init(InitArgs),

    /// Attach feature modules as git submodules.
    #[command(
        name = "add-module",
        visible_alias = "addsubmodule",
        about = "Add LiWE modules to a project",
        after_help = "EXAMPLES:\n\
            \x20 liwe3 add-module invoice\n\
            \x20 liwe3 add-module invoice product --path ../api"
    )]
    AddModule(AddModuleArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 liwe3 completions bash > ~/.local/share/bash-completion/completions/liwe3\n\
            \x20 liwe3 completions zsh  > ~/.zfunc/_liwe3\n\
            \x20 liwe3 completions fish > ~/.config/fish/completions/liwe3.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the liwe3 configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 liwe3 config get defaults.port\n\
            \x20 liwe3 config list\n\
            \x20 liwe3 config init"
    )]
    Config(ConfigCommands),
}

// ── create ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Project flavour.
    #[arg(value_enum, value_name = "STACK", help = "Stack to create")]
    pub stack: StackArg,

    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    #[command(flatten)]
    pub overwrite: OverwriteArgs,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project directory (default: current directory).
    #[arg(long = "path", value_name = "DIR", help = "Project directory")]
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub overwrite: OverwriteArgs,
}

/// Flags controlling replacement of files that already exist.
#[derive(Debug, Clone, Args)]
pub struct OverwriteArgs {
    /// Back up existing generated files to `<name>.old` and rewrite them.
    #[arg(
        long = "force",
        help = "Back up and overwrite existing generated files"
    )]
    pub force: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        requires = "force",
        help = "Do not ask before overwriting"
    )]
    pub yes: bool,
}

// ── add-module ────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddModuleArgs {
    /// Module names, e.g. `invoice`.
    #[arg(
        value_name = "NAME",
        required = true,
        num_args = 1..,
        help = "Modules to attach"
    )]
    pub modules: Vec<String>,

    /// Project directory (default: current directory).
    #[arg(long = "path", value_name = "DIR", help = "Project directory")]
    pub path: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.port`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
    /// Write a configuration file with the default values.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StackArg {
    /// Node.js backend.
    #[value(alias = "backend", alias = "node")]
    Nodejs,
    /// SvelteKit front-end.
    #[value(alias = "frontend", alias = "sveltekit")]
    Svelte,
}

impl From<StackArg> for Stack {
    fn from(arg: StackArg) -> Self {
        match arg {
            StackArg::Nodejs => Stack::Backend,
            StackArg::Svelte => Stack::Frontend,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_accepts_stack_aliases() {
        let cli = Cli::try_parse_from(["liwe3", "create", "backend", "api"]).unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(Stack::from(args.stack), Stack::Backend);
                assert_eq!(args.name, "api");
                assert!(!args.overwrite.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["liwe3", "create", "frontend", "web"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Create(CreateArgs {
                stack: StackArg::Svelte,
                ..
            })
        ));
    }

    #[test]
    fn unknown_stack_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["liwe3", "create", "rails", "app"]).is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "liwe3", "create", "nodejs", "api", "--pm", "yarn", "-p", "13000",
        ])
        .unwrap();
        assert_eq!(cli.global.pm.as_deref(), Some("yarn"));
        assert_eq!(cli.global.node_server_port, Some(13000));
    }

    #[test]
    fn pm_is_not_validated_by_the_parser() {
        let cli = Cli::try_parse_from(["liwe3", "--pm", "bun", "init"]).unwrap();
        assert_eq!(cli.global.pm.as_deref(), Some("bun"));
    }

    #[test]
    fn yes_requires_force() {
        assert!(Cli::try_parse_from(["liwe3", "init", "--yes"]).is_err());
        assert!(Cli::try_parse_from(["liwe3", "init", "--force", "--yes"]).is_ok());
    }

    #[test]
    fn add_module_needs_at_least_one_name() {
        assert!(Cli::try_parse_from(["liwe3", "add-module"]).is_err());
        let cli = Cli::try_parse_from(["liwe3", "addsubmodule", "invoice", "product"]).unwrap();
        match cli.command {
            Commands::AddModule(args) => assert_eq!(args.modules, ["invoice", "product"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["liwe3", "-q", "-v", "init"]).is_err());
    }
}

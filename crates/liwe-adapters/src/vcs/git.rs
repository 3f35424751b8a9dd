//! Git adapter driving the `git` executable.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use liwe_core::{
    application::ports::{CommandRunner, Invocation, VersionControl},
    domain::ModuleRef,
    error::LiweResult,
};

use crate::process::SystemCommandRunner;

/// Production version control through the `git` command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli {
    runner: SystemCommandRunner,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runner(runner: SystemCommandRunner) -> Self {
        Self { runner }
    }

    fn git(&self, root: &Path, args: &[&str]) -> LiweResult<()> {
        let invocation = Invocation::new(
            "git",
            args.iter().map(|a| a.to_string()).collect(),
            root,
        );
        self.runner.run(&invocation)
    }
}

impl VersionControl for GitCli {
    fn is_repository(&self, root: &Path) -> bool {
        let inside = Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(root)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        debug!(root = %root.display(), inside, "Checked for git work tree");
        inside
    }

    fn init(&self, root: &Path) -> LiweResult<()> {
        self.git(root, &["init", "--quiet"])
    }

    fn add_submodule(&self, root: &Path, module: &ModuleRef) -> LiweResult<()> {
        let alias = module.alias().to_string_lossy();
        self.git(
            root,
            &["submodule", "add", "--quiet", module.source(), &*alias],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    #[test]
    fn init_makes_a_repository() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = GitCli::with_runner(SystemCommandRunner::new().quiet(true));

        git.init(dir.path()).unwrap();
        assert!(git.is_repository(dir.path()));
        assert!(dir.path().join(".git").exists());
    }
}

//! Command runner backed by `std::process::Command`.

use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use liwe_core::{
    application::{ApplicationError, ports::{CommandRunner, Invocation}},
    error::LiweResult,
};

/// Runs commands as child processes with inherited stdio, so package
/// manager and generator prompts reach the user's terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner {
    quiet: bool,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard child stdout; stderr is still shown.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl CommandRunner for SystemCommandRunner {
    #[instrument(skip_all, fields(command = %invocation, cwd = %invocation.cwd.display()))]
    fn run(&self, invocation: &Invocation) -> LiweResult<()> {
        let stdout = if self.quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        };

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ApplicationError::ExternalCommandFailure {
                command: invocation.to_string(),
                reason: format!("could not start {}: {}", invocation.program, e),
            })?;

        debug!(%status, "Command finished");
        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::ExternalCommandFailure {
                command: invocation.to_string(),
                reason: status.to_string(),
            }
            .into())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn runs_in_the_given_directory() {
        let dir = TempDir::new().unwrap();
        let inv = Invocation::new(
            "sh",
            vec!["-c".into(), "touch marker".into()],
            dir.path(),
        );
        SystemCommandRunner::new().quiet(true).run(&inv).unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn non_zero_exit_is_external_failure() {
        let dir = TempDir::new().unwrap();
        let inv = Invocation::new("sh", vec!["-c".into(), "exit 3".into()], dir.path());
        let err = SystemCommandRunner::new().quiet(true).run(&inv).unwrap_err();
        assert!(err.to_string().contains("sh -c exit 3"));
    }

    #[test]
    fn missing_program_is_external_failure() {
        let dir = TempDir::new().unwrap();
        let inv = Invocation::new("liwe3-no-such-program", vec![], dir.path());
        assert!(SystemCommandRunner::new().run(&inv).is_err());
    }
}

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::{error::DomainError, modules::ModuleRef, template::TemplateId};

/// Coarse ordering of provisioning work.
///
/// Later phases rely on artifacts of earlier ones: the repository exists
/// before anything is installed, installed packages exist before files are
/// generated, generated directories exist before modules are attached, and
/// the manifest is final before it is stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Prepare,
    Install,
    Generate,
    Attach,
    Stamp,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prepare => "prepare",
            Self::Install => "install",
            Self::Generate => "generate",
            Self::Attach => "attach",
            Self::Stamp => "stamp",
        })
    }
}

/// What a file write does when the target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Leave an existing file alone.
    SkipIfExists,
    /// Move the existing file to `<name>.old`, then write.
    Overwrite,
    /// Leave the file alone if it already contains the marker, otherwise
    /// back it up and write.
    ReplaceUnlessContains(&'static str),
}

/// Suffix appended to a file name when it is moved aside before overwrite.
pub const BACKUP_SUFFIX: &str = ".old";

/// `server/server.ts` → `server/server.ts.old`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// One idempotent unit of provisioning work. All paths are relative to the
/// project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create `package.json` through the package manager.
    InitPackageManager,
    InstallPackages {
        packages: Vec<String>,
        dev: bool,
    },
    EnsureDir {
        path: PathBuf,
    },
    WriteFile {
        path: PathBuf,
        template: TemplateId,
        content: String,
        policy: WritePolicy,
    },
    /// Initialise version control if the root is not a repository yet.
    EnsureRepository,
    AttachModule(ModuleRef),
    /// Set entries of the `scripts` table in `package.json`.
    MergeScripts {
        scripts: Vec<(String, String)>,
    },
}

impl Step {
    /// Short human-readable label used in logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::InitPackageManager => "initialise package manifest".into(),
            Self::InstallPackages { packages, dev } => format!(
                "install {} {}package(s)",
                packages.len(),
                if *dev { "dev " } else { "" }
            ),
            Self::EnsureDir { path } => format!("ensure directory {}", path.display()),
            Self::WriteFile { path, template, .. } => {
                format!("write {} ({template})", path.display())
            }
            Self::EnsureRepository => "ensure git repository".into(),
            Self::AttachModule(module) => format!("attach module {}", module.alias().display()),
            Self::MergeScripts { .. } => "stamp package.json scripts".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub phase: Phase,
    pub step: Step,
}

/// Ordered list of steps for one provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionPlan {
    steps: Vec<PlannedStep>,
}

impl ProvisionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phase: Phase, step: Step) {
        self.steps.push(PlannedStep { phase, step });
    }

    pub fn with(mut self, phase: Phase, step: Step) -> Self {
        self.push(phase, step);
        self
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Phases must never go backwards.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut previous = Phase::Prepare;
        for planned in &self.steps {
            if planned.phase < previous {
                return Err(DomainError::PhaseOrder {
                    step: planned.step.describe(),
                    phase: planned.phase.to_string(),
                    previous: previous.to_string(),
                });
            }
            previous = planned.phase;
        }
        Ok(())
    }
}

// ── Reporting ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Skipped { reason: String },
}

impl StepOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub phase: Phase,
    pub description: String,
    pub outcome: StepOutcome,
}

/// What a provisioning run did.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub run_id: Uuid,
    pub root: PathBuf,
    pub steps: Vec<StepReport>,
}

impl ProvisionReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            root: root.into(),
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, phase: Phase, description: String, outcome: StepOutcome) {
        self.steps.push(StepReport {
            phase,
            description,
            outcome,
        });
    }

    pub fn applied(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_applied()).count()
    }

    pub fn skipped(&self) -> usize {
        self.steps.len() - self.applied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Prepare < Phase::Install);
        assert!(Phase::Install < Phase::Generate);
        assert!(Phase::Generate < Phase::Attach);
        assert!(Phase::Attach < Phase::Stamp);
    }

    #[test]
    fn plan_rejects_backwards_phase() {
        let plan = ProvisionPlan::new()
            .with(Phase::Generate, Step::EnsureDir { path: "server".into() })
            .with(
                Phase::Install,
                Step::InstallPackages {
                    packages: vec!["cors".into()],
                    dev: false,
                },
            );
        assert!(matches!(plan.validate(), Err(DomainError::PhaseOrder { .. })));
    }

    #[test]
    fn repository_step_may_precede_installs() {
        let plan = ProvisionPlan::new()
            .with(Phase::Prepare, Step::EnsureRepository)
            .with(
                Phase::Install,
                Step::InstallPackages {
                    packages: vec!["cors".into()],
                    dev: false,
                },
            );
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn plan_accepts_repeated_phase() {
        let plan = ProvisionPlan::new()
            .with(Phase::Generate, Step::EnsureDir { path: "a".into() })
            .with(Phase::Generate, Step::EnsureDir { path: "b".into() })
            .with(Phase::Stamp, Step::EnsureDir { path: "c".into() });
        assert!(plan.validate().is_ok());
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("server/server.ts")),
            PathBuf::from("server/server.ts.old")
        );
        assert_eq!(backup_path(Path::new(".env")), PathBuf::from(".env.old"));
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = ProvisionReport::new("/tmp/x");
        report.record(Phase::Generate, "a".into(), StepOutcome::Applied);
        report.record(Phase::Generate, "b".into(), StepOutcome::skipped("exists"));
        assert_eq!(report.applied(), 1);
        assert_eq!(report.skipped(), 1);
    }
}

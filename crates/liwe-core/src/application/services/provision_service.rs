//! Provision Service - main application orchestrator.
//!
//! This service coordinates a provisioning run:
//! 1. Check the run's precondition (root absent for create, manifest present for init)
//! 2. Build a plan, rendering every template up front
//! 3. Apply each step, skipping the ones whose effect is already on disk
//!
//! Nothing is written until every template has rendered, so a missing
//! placeholder aborts the run before the project root is touched.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, field, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{
            CommandRunner, Filesystem, Invocation, SecretSource, TemplateStore, VersionControl,
        },
    },
    domain::{
        DEFAULT_REMOTE_BASE, GeneratedFile, PackageManager, Phase, Port, ProjectName,
        ProvisionPlan, ProvisionReport, Stack, Step, StepOutcome, Substitutions, WritePolicy,
        backup_path, profile, validate_module_name,
    },
    error::LiweResult,
};

/// Package manifest every stack is built around.
pub const MANIFEST: &str = "package.json";

const SECRET_LEN: usize = 16;

/// Which flow a plan is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Fresh project: the plan starts by creating the package manifest.
    Create,
    /// Existing project: the manifest is already there.
    Init,
}

/// Inputs of one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub stack: Stack,
    pub project_name: ProjectName,
    /// Directory that owns every generated file.
    pub root: PathBuf,
    pub port: Port,
    pub package_manager: PackageManager,
    /// Back up and replace generated files that already exist.
    pub force: bool,
    /// Remote hosting the framework and feature-module repositories.
    pub remote_base: String,
}

impl ProvisionRequest {
    pub fn new(stack: Stack, project_name: ProjectName, root: impl Into<PathBuf>) -> Self {
        Self {
            stack,
            project_name,
            root: root.into(),
            port: Port::default(),
            package_manager: PackageManager::default(),
            force: false,
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
        }
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.port = port;
        self
    }

    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_remote_base(mut self, remote_base: impl Into<String>) -> Self {
        self.remote_base = remote_base.into();
        self
    }
}

/// Main provisioning service.
///
/// Owns the driven ports and runs plans against an explicit project root.
/// The process working directory is never consulted or changed.
pub struct ProvisionService {
    store: Box<dyn TemplateStore>,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    vcs: Box<dyn VersionControl>,
    secrets: Box<dyn SecretSource>,
}

impl ProvisionService {
    /// Create a new provision service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use liwe_core::application::ProvisionService;
    ///
    /// let service = ProvisionService::new(
    ///     Box::new(store),      // impl TemplateStore
    ///     Box::new(filesystem), // impl Filesystem
    ///     Box::new(runner),     // impl CommandRunner
    ///     Box::new(vcs),        // impl VersionControl
    ///     Box::new(secrets),    // impl SecretSource
    /// );
    /// ```
    pub fn new(
        store: Box<dyn TemplateStore>,
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
        vcs: Box<dyn VersionControl>,
        secrets: Box<dyn SecretSource>,
    ) -> Self {
        Self {
            store,
            filesystem,
            runner,
            vcs,
            secrets,
        }
    }

    /// Create a new project at `request.root`, which must not exist yet.
    #[instrument(
        skip_all,
        fields(
            stack = %request.stack,
            root = %request.root.display(),
            run_id = field::Empty
        )
    )]
    pub fn create(&self, request: &ProvisionRequest) -> LiweResult<ProvisionReport> {
        if self.filesystem.exists(&request.root) {
            return Err(
                ApplicationError::precondition(&request.root, "directory already exists").into(),
            );
        }

        let mut report = ProvisionReport::new(&request.root);
        tracing::Span::current().record("run_id", field::display(report.run_id));
        info!(
            project = %request.project_name,
            package_manager = %request.package_manager,
            "Creating {} project",
            request.stack
        );

        match request.stack {
            Stack::Backend => {
                let plan = self.plan(request, RunMode::Create)?;
                self.filesystem.create_dir_all(&request.root)?;
                report.record(
                    Phase::Install,
                    format!("create directory {}", request.root.display()),
                    StepOutcome::Applied,
                );
                self.execute_into(&plan, &request.root, request.package_manager, &mut report)?;
            }
            Stack::Frontend => {
                let plan = self.plan(request, RunMode::Init)?;
                let description = self.generate_frontend(request)?;
                report.record(Phase::Install, description, StepOutcome::Applied);
                self.execute_into(&plan, &request.root, request.package_manager, &mut report)?;
            }
        }

        info!(
            applied = report.applied(),
            skipped = report.skipped(),
            "Project created"
        );
        Ok(report)
    }

    /// Provision an existing project in place.
    #[instrument(
        skip_all,
        fields(
            stack = %request.stack,
            root = %request.root.display(),
            run_id = field::Empty
        )
    )]
    pub fn init(&self, request: &ProvisionRequest) -> LiweResult<ProvisionReport> {
        if !self.filesystem.exists(&request.root.join(MANIFEST)) {
            return Err(ApplicationError::precondition(
                &request.root,
                "no package.json found, this does not look like a Node project",
            )
            .into());
        }

        let plan = self.plan(request, RunMode::Init)?;
        let mut report = ProvisionReport::new(&request.root);
        tracing::Span::current().record("run_id", field::display(report.run_id));

        self.execute_into(&plan, &request.root, request.package_manager, &mut report)?;

        info!(
            applied = report.applied(),
            skipped = report.skipped(),
            "Project initialised"
        );
        Ok(report)
    }

    /// Attach feature modules by name to an existing project.
    #[instrument(
        skip_all,
        fields(stack = %stack, root = %root.display(), run_id = field::Empty)
    )]
    pub fn add_modules(
        &self,
        stack: Stack,
        root: &Path,
        names: &[String],
        remote_base: &str,
    ) -> LiweResult<ProvisionReport> {
        if !self.filesystem.exists(root) {
            return Err(ApplicationError::precondition(root, "directory does not exist").into());
        }
        for name in names {
            validate_module_name(name)?;
        }

        let stack_profile = profile(stack);
        let mut plan = ProvisionPlan::new().with(Phase::Prepare, Step::EnsureRepository);
        for name in names {
            plan.push(
                Phase::Attach,
                Step::AttachModule(stack_profile.feature_module_ref(remote_base, name)),
            );
        }

        let mut report = ProvisionReport::new(root);
        tracing::Span::current().record("run_id", field::display(report.run_id));
        self.execute_into(&plan, root, PackageManager::default(), &mut report)?;
        Ok(report)
    }

    /// Front-end if the manifest depends on `svelte`, backend otherwise.
    pub fn detect_stack(&self, root: &Path) -> LiweResult<Stack> {
        let path = root.join(MANIFEST);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::precondition(
                root,
                "no package.json found, this does not look like a Node project",
            )
            .into());
        }

        let manifest = self.read_manifest(&path)?;
        let has_svelte = ["dependencies", "devDependencies"].iter().any(|section| {
            manifest
                .get(*section)
                .and_then(Value::as_object)
                .is_some_and(|deps| deps.contains_key("svelte"))
        });

        let stack = if has_svelte {
            Stack::Frontend
        } else {
            Stack::Backend
        };
        debug!(%stack, "Detected stack");
        Ok(stack)
    }

    /// Package manager implied by a lockfile in `root`, if any.
    pub fn detect_package_manager(&self, root: &Path) -> Option<PackageManager> {
        [
            PackageManager::Yarn,
            PackageManager::Pnpm,
            PackageManager::Npm,
        ]
        .into_iter()
        .find(|pm| self.filesystem.exists(&root.join(pm.lockfile())))
    }

    /// Build the full plan for `request`. Every template is rendered here.
    pub fn plan(&self, request: &ProvisionRequest, mode: RunMode) -> LiweResult<ProvisionPlan> {
        let stack_profile = profile(request.stack);
        let substitutions = self.substitutions(request);
        // Git comes first so a missing or broken git fails before any install.
        let mut plan = ProvisionPlan::new().with(Phase::Prepare, Step::EnsureRepository);

        if mode == RunMode::Create {
            plan.push(Phase::Install, Step::InitPackageManager);
        }
        for (packages, dev) in [
            (stack_profile.runtime_packages, false),
            (stack_profile.dev_packages, true),
        ] {
            if !packages.is_empty() {
                plan.push(
                    Phase::Install,
                    Step::InstallPackages {
                        packages: packages.iter().map(|p| p.to_string()).collect(),
                        dev,
                    },
                );
            }
        }

        for dir in stack_profile.directories {
            plan.push(Phase::Generate, Step::EnsureDir { path: dir.into() });
        }
        for file in stack_profile.files {
            plan.push(
                Phase::Generate,
                self.write_step(file, request.force, &substitutions)?,
            );
        }

        plan.push(
            Phase::Attach,
            Step::AttachModule(stack_profile.core_module_ref(&request.remote_base)),
        );
        for module in stack_profile.default_modules(&request.remote_base) {
            plan.push(Phase::Attach, Step::AttachModule(module));
        }

        if !stack_profile.scripts.is_empty() {
            plan.push(
                Phase::Stamp,
                Step::MergeScripts {
                    scripts: stack_profile
                        .scripts
                        .iter()
                        .map(|(name, cmd)| (name.to_string(), cmd.to_string()))
                        .collect(),
                },
            );
        }
        for file in stack_profile.stamped_files {
            plan.push(
                Phase::Stamp,
                self.write_step(file, request.force, &substitutions)?,
            );
        }

        plan.validate()?;
        debug!(steps = plan.len(), ?mode, "Plan built");
        Ok(plan)
    }

    /// Run `plan` against `root`.
    #[instrument(skip_all, fields(root = %root.display(), run_id = field::Empty))]
    pub fn execute(
        &self,
        plan: &ProvisionPlan,
        root: &Path,
        package_manager: PackageManager,
    ) -> LiweResult<ProvisionReport> {
        let mut report = ProvisionReport::new(root);
        tracing::Span::current().record("run_id", field::display(report.run_id));
        self.execute_into(plan, root, package_manager, &mut report)?;
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn execute_into(
        &self,
        plan: &ProvisionPlan,
        root: &Path,
        package_manager: PackageManager,
        report: &mut ProvisionReport,
    ) -> LiweResult<()> {
        plan.validate()?;

        for planned in plan.steps() {
            let description = planned.step.describe();
            debug!(phase = %planned.phase, step = %description, "Applying step");

            let outcome = self
                .apply(&planned.step, root, package_manager)
                .inspect_err(|e| {
                    warn!(phase = %planned.phase, step = %description, error = %e, "Step failed");
                })?;

            match &outcome {
                StepOutcome::Applied => {
                    info!(phase = %planned.phase, step = %description, "Applied");
                }
                StepOutcome::Skipped { reason } => {
                    info!(phase = %planned.phase, step = %description, %reason, "Skipped");
                }
            }
            report.record(planned.phase, description, outcome);
        }

        Ok(())
    }

    fn apply(
        &self,
        step: &Step,
        root: &Path,
        package_manager: PackageManager,
    ) -> LiweResult<StepOutcome> {
        match step {
            Step::InitPackageManager => {
                if self.filesystem.exists(&root.join(MANIFEST)) {
                    return Ok(StepOutcome::skipped("package.json already exists"));
                }
                self.run(Invocation::new(
                    package_manager.program(),
                    package_manager.init_args(),
                    root,
                ))?;
                Ok(StepOutcome::Applied)
            }
            Step::InstallPackages { packages, dev } => {
                let missing = self.missing_packages(root, packages)?;
                if missing.is_empty() {
                    return Ok(StepOutcome::skipped("all packages already in package.json"));
                }
                self.run(Invocation::new(
                    package_manager.program(),
                    package_manager.add_args(&missing, *dev),
                    root,
                ))?;
                Ok(StepOutcome::Applied)
            }
            Step::EnsureDir { path } => {
                let target = root.join(path);
                if self.filesystem.exists(&target) {
                    return Ok(StepOutcome::skipped("directory exists"));
                }
                self.filesystem.create_dir_all(&target)?;
                Ok(StepOutcome::Applied)
            }
            Step::WriteFile {
                path,
                content,
                policy,
                ..
            } => self.write(&root.join(path), content, *policy),
            Step::EnsureRepository => {
                if self.vcs.is_repository(root) {
                    return Ok(StepOutcome::skipped("already a git repository"));
                }
                self.vcs.init(root)?;
                Ok(StepOutcome::Applied)
            }
            Step::AttachModule(module) => {
                let target = root.join(module.alias());
                if self.filesystem.exists(&target) {
                    info!(module = %module, "Module already present, not attaching again");
                    return Ok(StepOutcome::skipped("module path exists"));
                }
                if let Some(parent) = target.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.vcs.add_submodule(root, module)?;
                Ok(StepOutcome::Applied)
            }
            Step::MergeScripts { scripts } => self.merge_scripts(&root.join(MANIFEST), scripts),
        }
    }

    fn write(&self, target: &Path, content: &str, policy: WritePolicy) -> LiweResult<StepOutcome> {
        if !self.filesystem.exists(target) {
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(target, content)?;
            return Ok(StepOutcome::Applied);
        }

        match policy {
            WritePolicy::SkipIfExists => Ok(StepOutcome::skipped("file exists")),
            WritePolicy::ReplaceUnlessContains(marker) => {
                let existing = self.filesystem.read_to_string(target)?;
                if existing.contains(marker) {
                    return Ok(StepOutcome::skipped(format!("file already contains {marker}")));
                }
                self.replace(target, content)
            }
            WritePolicy::Overwrite => self.replace(target, content),
        }
    }

    /// Move `target` to its backup name, then write the new content.
    fn replace(&self, target: &Path, content: &str) -> LiweResult<StepOutcome> {
        let backup = backup_path(target);
        if self.filesystem.exists(&backup) {
            return Err(ApplicationError::BackupCollision {
                path: target.to_path_buf(),
                backup,
            }
            .into());
        }

        self.filesystem.rename(target, &backup)?;
        self.filesystem.write_file(target, content)?;
        info!(backup = %backup.display(), "Previous file kept as backup");
        Ok(StepOutcome::Applied)
    }

    fn merge_scripts(&self, path: &Path, scripts: &[(String, String)]) -> LiweResult<StepOutcome> {
        let mut manifest = self.read_manifest(path)?;

        {
            let table = match manifest
                .entry("scripts")
                .or_insert_with(|| Value::Object(Map::new()))
            {
                Value::Object(table) => table,
                _ => {
                    return Err(ApplicationError::ManifestInvalid {
                        path: path.to_path_buf(),
                        reason: "\"scripts\" is not an object".into(),
                    }
                    .into());
                }
            };

            let up_to_date = scripts
                .iter()
                .all(|(name, cmd)| table.get(name).and_then(Value::as_str) == Some(cmd.as_str()));
            if up_to_date {
                return Ok(StepOutcome::skipped("scripts already set"));
            }

            for (name, cmd) in scripts {
                table.insert(name.clone(), Value::String(cmd.clone()));
            }
        }

        let mut text = serde_json::to_string_pretty(&Value::Object(manifest)).map_err(|e| {
            ApplicationError::ManifestInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        text.push('\n');
        self.filesystem.write_file(path, &text)?;
        Ok(StepOutcome::Applied)
    }

    fn read_manifest(&self, path: &Path) -> LiweResult<Map<String, Value>> {
        let text = self.filesystem.read_to_string(path)?;
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ApplicationError::ManifestInvalid {
                path: path.to_path_buf(),
                reason: "expected a JSON object".into(),
            }
            .into()),
            Err(e) => Err(ApplicationError::ManifestInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// Packages not yet listed in either dependency table of the manifest.
    fn missing_packages(&self, root: &Path, packages: &[String]) -> LiweResult<Vec<String>> {
        let path = root.join(MANIFEST);
        if !self.filesystem.exists(&path) {
            return Ok(packages.to_vec());
        }

        let manifest = self.read_manifest(&path)?;
        let listed = |name: &str| {
            ["dependencies", "devDependencies"].iter().any(|section| {
                manifest
                    .get(*section)
                    .and_then(Value::as_object)
                    .is_some_and(|deps| deps.contains_key(name))
            })
        };

        Ok(packages
            .iter()
            .filter(|spec| !listed(package_name(spec)))
            .cloned()
            .collect())
    }

    /// Run the stack's project generator in the parent of `request.root`.
    fn generate_frontend(&self, request: &ProvisionRequest) -> LiweResult<String> {
        let dir_name = request
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ApplicationError::precondition(&request.root, "project root has no directory name")
            })?;
        let parent = request
            .root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        if !self.filesystem.exists(parent) {
            self.filesystem.create_dir_all(parent)?;
        }

        let (program, args) = request
            .package_manager
            .exec_command(&["sv", "create", &dir_name]);
        let invocation = Invocation::new(program, args, parent);
        let description = format!("generate project with `{invocation}`");
        self.run(invocation.clone())?;

        if !self.filesystem.exists(&request.root) {
            return Err(ApplicationError::ExternalCommandFailure {
                command: invocation.to_string(),
                reason: format!("{} was not created", request.root.display()),
            }
            .into());
        }
        Ok(description)
    }

    fn write_step(
        &self,
        file: &GeneratedFile,
        force: bool,
        substitutions: &Substitutions,
    ) -> LiweResult<Step> {
        let template = self.store.get(file.template)?;
        let content = template.render(substitutions)?;
        let policy = if force {
            WritePolicy::Overwrite
        } else {
            file.policy
        };

        Ok(Step::WriteFile {
            path: file.path.into(),
            template: file.template,
            content,
            policy,
        })
    }

    /// Values for every placeholder the built-in templates use. Secrets are
    /// fresh per run.
    fn substitutions(&self, request: &ProvisionRequest) -> Substitutions {
        Substitutions::new()
            .with("APP_NAME", request.project_name.as_str())
            .with("PORT", request.port.to_string())
            .with("DB_NAME", request.project_name.database_name())
            .with("SECRET", self.secrets.generate(SECRET_LEN))
            .with("REMOTE", self.secrets.generate(SECRET_LEN))
    }

    fn run(&self, invocation: Invocation) -> LiweResult<()> {
        info!(command = %invocation, cwd = %invocation.cwd.display(), "Running");
        self.runner.run(&invocation)
    }
}

/// `express@4.19.2` → `express`, `@types/express@4.17.21` → `@types/express`
fn package_name(spec: &str) -> &str {
    let offset = usize::from(spec.starts_with('@'));
    match spec[offset..].find('@') {
        Some(at) => &spec[..offset + at],
        None => spec,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::ports::{
        MockCommandRunner, MockFilesystem, MockSecretSource, MockTemplateStore,
        MockVersionControl,
    };
    use crate::domain::{DomainError, ModuleRef, Template};
    use crate::error::LiweError;

    fn request(stack: Stack) -> ProvisionRequest {
        ProvisionRequest::new(
            stack,
            ProjectName::new("shop").unwrap(),
            "/work/shop",
        )
    }

    fn store_with(source: &'static str) -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store
            .expect_get()
            .returning(move |id| Ok(Template::from_static(id, source)));
        store
    }

    fn secrets() -> MockSecretSource {
        let mut secrets = MockSecretSource::new();
        secrets.expect_generate().returning(|len| "s".repeat(len));
        secrets
    }

    fn service(
        store: MockTemplateStore,
        filesystem: MockFilesystem,
        runner: MockCommandRunner,
        vcs: MockVersionControl,
    ) -> ProvisionService {
        ProvisionService::new(
            Box::new(store),
            Box::new(filesystem),
            Box::new(runner),
            Box::new(vcs),
            Box::new(secrets()),
        )
    }

    #[test]
    fn package_names_drop_versions() {
        assert_eq!(package_name("express@4.19.2"), "express");
        assert_eq!(package_name("@types/express@4.17.21"), "@types/express");
        assert_eq!(package_name("@fsoft/diff-patch"), "@fsoft/diff-patch");
        assert_eq!(package_name("cors"), "cors");
    }

    #[test]
    fn create_refuses_existing_root_without_mutating() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        // No other expectations: any write, command or git call panics.
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );

        let err = svc.create(&request(Stack::Backend)).unwrap_err();
        assert!(matches!(
            err,
            LiweError::Application(ApplicationError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn missing_placeholder_aborts_before_anything_is_written() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        let svc = service(
            store_with("value=%%NOT_PROVIDED%%"),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );

        let err = svc.create(&request(Stack::Backend)).unwrap_err();
        assert_eq!(
            err,
            LiweError::Domain(DomainError::MissingPlaceholder {
                name: "NOT_PROVIDED".into()
            })
        );
    }

    #[test]
    fn init_requires_manifest() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );

        let err = svc.init(&request(Stack::Frontend)).unwrap_err();
        assert!(matches!(
            err,
            LiweError::Application(ApplicationError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn plan_phases_are_ordered_and_render_port() {
        let svc = service(
            store_with("port=%%PORT%% db=%%DB_NAME%%"),
            MockFilesystem::new(),
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let req = request(Stack::Backend).with_port(Port::new(13000).unwrap());

        let plan = svc.plan(&req, RunMode::Create).unwrap();
        assert!(plan.validate().is_ok());
        assert_eq!(plan.steps()[0].step, Step::EnsureRepository);
        assert_eq!(plan.steps()[1].step, Step::InitPackageManager);

        let written: Vec<_> = plan
            .steps()
            .iter()
            .filter_map(|p| match &p.step {
                Step::WriteFile { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert!(!written.is_empty());
        assert!(written.iter().all(|c| *c == "port=13000 db=SHOP"));
    }

    #[test]
    fn init_plan_has_no_manifest_initialisation() {
        let svc = service(
            store_with(""),
            MockFilesystem::new(),
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = svc.plan(&request(Stack::Backend), RunMode::Init).unwrap();
        assert!(
            !plan
                .steps()
                .iter()
                .any(|p| p.step == Step::InitPackageManager)
        );
    }

    #[test]
    fn init_plan_ensures_repository_before_installing() {
        let svc = service(
            store_with(""),
            MockFilesystem::new(),
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = svc.plan(&request(Stack::Frontend), RunMode::Init).unwrap();
        let first = &plan.steps()[0];
        assert_eq!(first.phase, Phase::Prepare);
        assert_eq!(first.step, Step::EnsureRepository);
        assert_eq!(
            plan.steps()
                .iter()
                .filter(|p| p.step == Step::EnsureRepository)
                .count(),
            1
        );
    }

    #[test]
    fn force_turns_every_write_into_overwrite() {
        let svc = service(
            store_with(""),
            MockFilesystem::new(),
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = svc
            .plan(&request(Stack::Frontend).with_force(true), RunMode::Init)
            .unwrap();
        for planned in plan.steps() {
            if let Step::WriteFile { policy, .. } = &planned.step {
                assert_eq!(*policy, WritePolicy::Overwrite);
            }
        }
    }

    #[test]
    fn forced_write_fails_when_backup_exists() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new().with(
            Phase::Generate,
            Step::WriteFile {
                path: ".env".into(),
                template: crate::domain::TemplateId::FrontendEnv,
                content: "X=1\n".into(),
                policy: WritePolicy::Overwrite,
            },
        );

        let err = svc
            .execute(&plan, Path::new("/p"), PackageManager::Pnpm)
            .unwrap_err();
        assert_eq!(
            err,
            LiweError::Application(ApplicationError::BackupCollision {
                path: PathBuf::from("/p/.env"),
                backup: PathBuf::from("/p/.env.old"),
            })
        );
    }

    #[test]
    fn forced_write_moves_existing_file_aside() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/p/server/server.ts"));
        fs.expect_rename()
            .withf(|from, to| {
                from == Path::new("/p/server/server.ts")
                    && to == Path::new("/p/server/server.ts.old")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .withf(|path, content| path == Path::new("/p/server/server.ts") && content == "new")
            .times(1)
            .returning(|_, _| Ok(()));
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new().with(
            Phase::Generate,
            Step::WriteFile {
                path: "server/server.ts".into(),
                template: crate::domain::TemplateId::ServerEntry,
                content: "new".into(),
                policy: WritePolicy::Overwrite,
            },
        );

        let report = svc
            .execute(&plan, Path::new("/p"), PackageManager::Pnpm)
            .unwrap();
        assert_eq!(report.applied(), 1);
    }

    #[test]
    fn marked_file_is_left_alone() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/p/svelte.config.js"));
        fs.expect_read_to_string()
            .returning(|_| Ok("alias: { $modules: 'src/modules' }".into()));
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new().with(
            Phase::Stamp,
            Step::WriteFile {
                path: "svelte.config.js".into(),
                template: crate::domain::TemplateId::SvelteConfig,
                content: "new config".into(),
                policy: WritePolicy::ReplaceUnlessContains("$modules"),
            },
        );

        let report = svc
            .execute(&plan, Path::new("/p"), PackageManager::Pnpm)
            .unwrap();
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn attach_skips_existing_alias() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let mut vcs = MockVersionControl::new();
        vcs.expect_add_submodule().never();
        let svc = service(MockTemplateStore::new(), fs, MockCommandRunner::new(), vcs);
        let plan = ProvisionPlan::new().with(
            Phase::Attach,
            Step::AttachModule(ModuleRef::new("git@host:o/mod-user", "server/modules/user")),
        );

        let report = svc
            .execute(&plan, Path::new("/p"), PackageManager::Pnpm)
            .unwrap();
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn repository_is_initialised_once() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_repository().times(1).returning(|_| false);
        vcs.expect_init()
            .withf(|root| root == Path::new("/p"))
            .times(1)
            .returning(|_| Ok(()));
        let svc = service(
            MockTemplateStore::new(),
            MockFilesystem::new(),
            MockCommandRunner::new(),
            vcs,
        );
        let plan = ProvisionPlan::new().with(Phase::Prepare, Step::EnsureRepository);

        let report = svc
            .execute(&plan, Path::new("/p"), PackageManager::Pnpm)
            .unwrap();
        assert_eq!(report.applied(), 1);
    }

    #[test]
    fn merge_scripts_keeps_other_manifest_keys() {
        let written = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&written);

        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string().returning(|_| {
            Ok(r#"{"name":"shop","version":"1.0.0","scripts":{"lint":"eslint ."}}"#.into())
        });
        fs.expect_write_file().times(1).returning(move |_, content| {
            *sink.lock().unwrap() = content.to_string();
            Ok(())
        });
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new().with(
            Phase::Stamp,
            Step::MergeScripts {
                scripts: vec![("test".into(), "jest".into())],
            },
        );
        svc.execute(&plan, Path::new("/p"), PackageManager::Npm)
            .unwrap();

        let manifest: Value = serde_json::from_str(&written.lock().unwrap()).unwrap();
        assert_eq!(manifest["name"], "shop");
        assert_eq!(manifest["version"], "1.0.0");
        assert_eq!(manifest["scripts"]["lint"], "eslint .");
        assert_eq!(manifest["scripts"]["test"], "jest");
    }

    #[test]
    fn merge_scripts_skips_when_up_to_date() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok(r#"{"scripts":{"test":"jest"}}"#.into()));
        fs.expect_write_file().never();
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new().with(
            Phase::Stamp,
            Step::MergeScripts {
                scripts: vec![("test".into(), "jest".into())],
            },
        );

        let report = svc
            .execute(&plan, Path::new("/p"), PackageManager::Npm)
            .unwrap();
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn install_only_requests_missing_packages() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok(r#"{"dependencies":{"cors":"^2.8.5"}}"#.into()));
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|inv| {
                inv.program == "npm"
                    && inv.args == ["install", "express@4.19.2", "--silent"]
                    && inv.cwd == Path::new("/p")
            })
            .times(1)
            .returning(|_| Ok(()));
        let svc = service(
            MockTemplateStore::new(),
            fs,
            runner,
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new().with(
            Phase::Install,
            Step::InstallPackages {
                packages: vec!["cors".into(), "express@4.19.2".into()],
                dev: false,
            },
        );

        svc.execute(&plan, Path::new("/p"), PackageManager::Npm)
            .unwrap();
    }

    #[test]
    fn command_failure_halts_the_run() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|inv| {
            Err(ApplicationError::ExternalCommandFailure {
                command: inv.to_string(),
                reason: "exit status: 1".into(),
            }
            .into())
        });
        let svc = service(
            MockTemplateStore::new(),
            fs,
            runner,
            MockVersionControl::new(),
        );
        let plan = ProvisionPlan::new()
            .with(
                Phase::Install,
                Step::InstallPackages {
                    packages: vec!["cors".into()],
                    dev: false,
                },
            )
            .with(Phase::Generate, Step::EnsureDir { path: "server".into() });

        let err = svc
            .execute(&plan, Path::new("/p"), PackageManager::Pnpm)
            .unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::External);
    }

    #[test]
    fn frontend_create_runs_generator_in_parent() {
        let created = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&created);

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(move |p| {
            p == Path::new("/work") || (p == Path::new("/work/shop") && *flag.lock().unwrap())
        });
        let mut runner = MockCommandRunner::new();
        let flag = Arc::clone(&created);
        runner
            .expect_run()
            .withf(|inv| inv.program == "npx" && inv.args == ["sv", "create", "shop"])
            .times(1)
            .returning(move |inv| {
                assert_eq!(inv.cwd, Path::new("/work"));
                *flag.lock().unwrap() = true;
                Err(ApplicationError::ExternalCommandFailure {
                    command: inv.to_string(),
                    reason: "stop here".into(),
                }
                .into())
            });
        let svc = service(store_with(""), fs, runner, MockVersionControl::new());

        let req = request(Stack::Frontend).with_package_manager(PackageManager::Npm);
        assert!(svc.create(&req).is_err());
        assert!(*created.lock().unwrap());
    }

    #[test]
    fn detects_svelte_from_dev_dependencies() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok(r#"{"devDependencies":{"svelte":"^5.0.0"}}"#.into()));
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        assert_eq!(svc.detect_stack(Path::new("/p")).unwrap(), Stack::Frontend);
    }

    #[test]
    fn detects_backend_without_svelte() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok(r#"{"dependencies":{"express":"4.19.2"}}"#.into()));
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        assert_eq!(svc.detect_stack(Path::new("/p")).unwrap(), Stack::Backend);
    }

    #[test]
    fn lockfile_selects_package_manager() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/p/yarn.lock"));
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );
        assert_eq!(
            svc.detect_package_manager(Path::new("/p")),
            Some(PackageManager::Yarn)
        );
    }

    #[test]
    fn add_modules_rejects_bad_names_before_touching_git() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        let svc = service(
            MockTemplateStore::new(),
            fs,
            MockCommandRunner::new(),
            MockVersionControl::new(),
        );

        let err = svc
            .add_modules(
                Stack::Backend,
                Path::new("/p"),
                &["user".into(), "../evil".into()],
                DEFAULT_REMOTE_BASE,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LiweError::Domain(DomainError::InvalidModuleName { .. })
        ));
    }
}

//! In-memory version control for testing.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use liwe_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, VersionControl},
    },
    domain::ModuleRef,
    error::LiweResult,
};

use crate::filesystem::MemoryFilesystem;

/// Version control that records submodules in a [`MemoryFilesystem`].
///
/// `add_submodule` creates the alias directory and appends an entry to
/// `.gitmodules`, mirroring what `git submodule add` leaves on disk.
#[derive(Debug, Clone)]
pub struct MemoryVersionControl {
    filesystem: MemoryFilesystem,
    repositories: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl MemoryVersionControl {
    pub fn new(filesystem: MemoryFilesystem) -> Self {
        Self {
            filesystem,
            repositories: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    /// Number of `.gitmodules` entries for `path` under `root`.
    pub fn gitmodules_entries(&self, root: &Path, alias: &str) -> usize {
        let needle = format!("[submodule \"{alias}\"]");
        self.filesystem
            .read_file(root.join(".gitmodules"))
            .map(|text| text.lines().filter(|l| *l == needle).count())
            .unwrap_or(0)
    }
}

impl VersionControl for MemoryVersionControl {
    fn is_repository(&self, root: &Path) -> bool {
        self.repositories
            .read()
            .map(|repos| root.ancestors().any(|a| repos.contains(a)))
            .unwrap_or(false)
    }

    fn init(&self, root: &Path) -> LiweResult<()> {
        self.filesystem.create_dir_all(&root.join(".git"))?;
        self.repositories
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .insert(root.to_path_buf());
        Ok(())
    }

    fn add_submodule(&self, root: &Path, module: &ModuleRef) -> LiweResult<()> {
        let command = format!("git submodule add --quiet {}", module);
        if !self.is_repository(root) {
            return Err(ApplicationError::ExternalCommandFailure {
                command,
                reason: "not a git repository".into(),
            }
            .into());
        }

        let target = root.join(module.alias());
        if self.filesystem.exists(&target) {
            return Err(ApplicationError::ExternalCommandFailure {
                command,
                reason: format!("'{}' already exists", module.alias().display()),
            }
            .into());
        }
        self.filesystem.create_dir_all(&target)?;

        let gitmodules = root.join(".gitmodules");
        let mut text = self.filesystem.read_file(&gitmodules).unwrap_or_default();
        let alias = module.alias().display();
        text.push_str(&format!(
            "[submodule \"{alias}\"]\n\tpath = {alias}\n\turl = {}\n",
            module.source()
        ));
        self.filesystem.write_file(&gitmodules, &text)
    }
}

//! Templates compiled into the binary.
//!
//! Every [`TemplateId`] maps to one asset under `templates/`, embedded with
//! `include_str!`. An optional override directory lets a user replace any
//! asset without rebuilding:
//!
//! ```text
//! <override-dir>/
//! ├── runtime-config     # replaces templates/nodejs/data.json
//! └── server-entry       # replaces templates/nodejs/server.ts
//! ```
//!
//! Override files are named after [`TemplateId::as_str`]; ids without an
//! override file fall back to the built-in text.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use liwe_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{Template, TemplateId},
    error::LiweResult,
};

fn builtin_source(id: TemplateId) -> &'static str {
    match id {
        TemplateId::EslintIgnore => include_str!("../../templates/nodejs/eslintignore"),
        TemplateId::EslintRc => include_str!("../../templates/nodejs/eslintrc.js"),
        TemplateId::GitIgnore => include_str!("../../templates/nodejs/gitignore"),
        TemplateId::TsConfig => include_str!("../../templates/nodejs/tsconfig.json"),
        TemplateId::ServerEntry => include_str!("../../templates/nodejs/server.ts"),
        TemplateId::RuntimeConfig => include_str!("../../templates/nodejs/data.json"),
        TemplateId::MaidConfig => include_str!("../../templates/svelte/maid.json"),
        TemplateId::SvelteLayout => include_str!("../../templates/svelte/layout.svelte"),
        TemplateId::SvelteConfig => include_str!("../../templates/svelte/svelte.config.js"),
        TemplateId::FrontendEnv => include_str!("../../templates/svelte/env"),
    }
}

/// Read-only store of the built-in templates.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTemplates {
    override_dir: Option<PathBuf>,
}

impl BuiltinTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer files from `dir` over the embedded assets.
    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    fn load_override(&self, id: TemplateId) -> LiweResult<Option<Template>> {
        let Some(dir) = &self.override_dir else {
            return Ok(None);
        };

        let path = dir.join(id.as_str());
        if !path.is_file() {
            return Ok(None);
        }

        let source = std::fs::read_to_string(&path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Unreadable template override");
            ApplicationError::filesystem(&path, format!("Failed to read template: {e}"))
        })?;
        debug!(%id, path = %path.display(), "Using template override");
        Ok(Some(Template::new(id, source)))
    }
}

impl TemplateStore for BuiltinTemplates {
    fn get(&self, id: TemplateId) -> LiweResult<Template> {
        match self.load_override(id)? {
            Some(template) => Ok(template),
            None => Ok(Template::from_static(id, builtin_source(id))),
        }
    }

    fn list(&self) -> LiweResult<Vec<Template>> {
        TemplateId::ALL.into_iter().map(|id| self.get(id)).collect()
    }
}

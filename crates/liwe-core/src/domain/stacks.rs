//! Static description of what each stack provisions.
//!
//! A [`StackProfile`] is pure data: package lists, generated files, and the
//! module layout. The provisioning service turns a profile into a
//! [`ProvisionPlan`](crate::domain::ProvisionPlan).
//!
//! # Adding a Stack
//!
//! 1. Add the variant to `Stack` in `value_objects.rs`
//! 2. Add a `StackProfile` static here and an arm in [`profile`]
//! 3. Add any new templates to `TemplateId` and the template store

use crate::domain::{
    modules::{ModuleRef, remote_url},
    plan::WritePolicy,
    template::TemplateId,
    value_objects::Stack,
};

/// A file generated from a template, relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: &'static str,
    pub template: TemplateId,
    pub policy: WritePolicy,
}

const fn file(path: &'static str, template: TemplateId) -> GeneratedFile {
    GeneratedFile {
        path,
        template,
        policy: WritePolicy::SkipIfExists,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackProfile {
    pub stack: Stack,
    pub runtime_packages: &'static [&'static str],
    pub dev_packages: &'static [&'static str],
    /// Empty directories the generated layout needs.
    pub directories: &'static [&'static str],
    /// Files written in the generate phase.
    pub files: &'static [GeneratedFile],
    /// Repository name and alias of the framework core module.
    pub core_module: (&'static str, &'static str),
    /// Directory holding one checkout per feature module.
    pub modules_dir: &'static str,
    /// Feature-module repositories are named `<prefix><module>`.
    pub module_repo_prefix: &'static str,
    pub feature_modules: &'static [&'static str],
    /// `package.json` scripts set in the stamp phase.
    pub scripts: &'static [(&'static str, &'static str)],
    /// Files written in the stamp phase, after modules are attached.
    pub stamped_files: &'static [GeneratedFile],
}

impl StackProfile {
    pub fn core_module_ref(&self, remote_base: &str) -> ModuleRef {
        let (repository, alias) = self.core_module;
        ModuleRef::new(remote_url(remote_base, repository), alias)
    }

    /// Reference for a feature module; the name must already be validated.
    pub fn feature_module_ref(&self, remote_base: &str, name: &str) -> ModuleRef {
        let repository = format!("{}{}", self.module_repo_prefix, name);
        ModuleRef::new(
            remote_url(remote_base, &repository),
            format!("{}/{}", self.modules_dir, name),
        )
    }

    pub fn default_modules(&self, remote_base: &str) -> Vec<ModuleRef> {
        self.feature_modules
            .iter()
            .map(|name| self.feature_module_ref(remote_base, name))
            .collect()
    }

    /// Every template the profile renders.
    pub fn templates(&self) -> impl Iterator<Item = TemplateId> + '_ {
        self.files
            .iter()
            .chain(self.stamped_files.iter())
            .map(|f| f.template)
    }
}

/// Default remote hosting the LiWE framework and module repositories.
pub const DEFAULT_REMOTE_BASE: &str = "git@github.com:fsoft72";

pub static BACKEND: StackProfile = StackProfile {
    stack: Stack::Backend,
    runtime_packages: &[
        "@fsoft/diff-patch",
        "arangojs",
        "body-parser",
        "cors",
        "exif",
        "express@4.19.2",
        "express-dump-curl",
        "express-fileupload",
        "handlebars",
        "jsonwebtoken",
        "mime-types",
        "node-2fa",
        "nodemailer",
        "pdf-lib",
        "sharp",
        "socket.io",
    ],
    dev_packages: &[
        "@types/body-parser",
        "@types/exif",
        "@types/express@4.17.21",
        "@types/express-fileupload",
        "@types/jsonwebtoken",
        "@types/mime-types",
        "@types/node",
        "nodemon",
        "typescript",
    ],
    directories: &["server", "server/modules", "etc/config"],
    files: &[
        file(".eslintignore", TemplateId::EslintIgnore),
        file(".eslintrc.js", TemplateId::EslintRc),
        file(".gitignore", TemplateId::GitIgnore),
        file("tsconfig.json", TemplateId::TsConfig),
        file("server/server.ts", TemplateId::ServerEntry),
    ],
    core_module: ("liwe3-nodejs.git", "server/liwe"),
    modules_dir: "server/modules",
    module_repo_prefix: "nodejs-mod-",
    feature_modules: &[
        "address",
        "category",
        "session",
        "system",
        "tag",
        "mediamanager",
        "user",
    ],
    scripts: &[
        ("dev", "tsc --build . -w"),
        (
            "start",
            "nodemon --ext js --ignore node_modules --watch dist/server dist/server/server.js",
        ),
        (
            "start-empty",
            "export EMPTY_DB=1; export TEST_DB=1; nodemon --ext js --ignore node_modules --watch dist/server dist/server/server.js",
        ),
        ("test", "jest"),
    ],
    stamped_files: &[file("etc/config/data.json", TemplateId::RuntimeConfig)],
};

pub static FRONTEND: StackProfile = StackProfile {
    stack: Stack::Frontend,
    runtime_packages: &[],
    dev_packages: &[
        "@types/chroma-js",
        "chroma-js",
        "marked",
        "svelte-check",
        "svelte-dnd-action",
        "svelte-hero-icons",
        "svelte-markdown",
        "svelte-select",
        "svelvet",
    ],
    directories: &["src/routes", "src/modules"],
    files: &[
        file("maid.json", TemplateId::MaidConfig),
        file("src/routes/+layout.svelte", TemplateId::SvelteLayout),
    ],
    core_module: ("liwe3-svelte", "src/liwe3"),
    modules_dir: "src/modules",
    module_repo_prefix: "svelte-mod-",
    feature_modules: &["mediamanager", "system", "tag", "theme", "user"],
    scripts: &[],
    stamped_files: &[
        file(".env", TemplateId::FrontendEnv),
        GeneratedFile {
            path: "svelte.config.js",
            template: TemplateId::SvelteConfig,
            policy: WritePolicy::ReplaceUnlessContains("$modules"),
        },
    ],
};

pub fn profile(stack: Stack) -> &'static StackProfile {
    match stack {
        Stack::Backend => &BACKEND,
        Stack::Frontend => &FRONTEND,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn profile_matches_stack() {
        assert_eq!(profile(Stack::Backend).stack, Stack::Backend);
        assert_eq!(profile(Stack::Frontend).stack, Stack::Frontend);
    }

    #[test]
    fn backend_feature_modules_live_under_server_modules() {
        let m = BACKEND.feature_module_ref(DEFAULT_REMOTE_BASE, "user");
        assert_eq!(m.source(), "git@github.com:fsoft72/nodejs-mod-user");
        assert_eq!(m.alias(), Path::new("server/modules/user"));
    }

    #[test]
    fn frontend_core_module() {
        let m = FRONTEND.core_module_ref(DEFAULT_REMOTE_BASE);
        assert_eq!(m.source(), "git@github.com:fsoft72/liwe3-svelte");
        assert_eq!(m.alias(), Path::new("src/liwe3"));
    }

    #[test]
    fn default_modules_are_unique() {
        for p in [&BACKEND, &FRONTEND] {
            let modules = p.default_modules(DEFAULT_REMOTE_BASE);
            let mut aliases: Vec<_> = modules.iter().map(|m| m.alias().to_path_buf()).collect();
            aliases.sort();
            aliases.dedup();
            assert_eq!(aliases.len(), p.feature_modules.len());
        }
    }

    #[test]
    fn modules_dir_is_declared_as_directory() {
        for p in [&BACKEND, &FRONTEND] {
            assert!(p.directories.contains(&p.modules_dir));
        }
    }

    #[test]
    fn runtime_config_is_stamped_not_generated() {
        assert!(
            BACKEND
                .stamped_files
                .iter()
                .any(|f| f.template == TemplateId::RuntimeConfig)
        );
        assert!(
            !BACKEND
                .files
                .iter()
                .any(|f| f.template == TemplateId::RuntimeConfig)
        );
    }
}

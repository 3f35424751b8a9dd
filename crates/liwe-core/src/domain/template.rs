//! Templates and the placeholder renderer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Template (static asset)                                    │
//! │  ├── TemplateId: logical purpose ("runtime-config", ...)    │
//! │  └── source: text with %%NAME%% tokens                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Substitutions (per run)                                    │
//! │  └── %%PORT%% -> "12000", %%SECRET%% -> "x9Tq..."           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering is all-or-nothing: every token must have a value, otherwise
//! nothing is produced. Values are inserted verbatim and never re-scanned.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::error::DomainError;

/// `%%IDENTIFIER%%`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%%([A-Za-z_][A-Za-z0-9_]*)%%").expect("placeholder pattern is valid")
});

// ── TemplateId ───────────────────────────────────────────────────────────────

/// Logical purpose of a built-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    EslintIgnore,
    EslintRc,
    GitIgnore,
    TsConfig,
    ServerEntry,
    RuntimeConfig,
    MaidConfig,
    SvelteLayout,
    SvelteConfig,
    FrontendEnv,
}

impl TemplateId {
    pub const ALL: [TemplateId; 10] = [
        Self::EslintIgnore,
        Self::EslintRc,
        Self::GitIgnore,
        Self::TsConfig,
        Self::ServerEntry,
        Self::RuntimeConfig,
        Self::MaidConfig,
        Self::SvelteLayout,
        Self::SvelteConfig,
        Self::FrontendEnv,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EslintIgnore => "eslint-ignore",
            Self::EslintRc => "eslint-rc",
            Self::GitIgnore => "git-ignore",
            Self::TsConfig => "ts-config",
            Self::ServerEntry => "server-entry",
            Self::RuntimeConfig => "runtime-config",
            Self::MaidConfig => "maid-config",
            Self::SvelteLayout => "svelte-layout",
            Self::SvelteConfig => "svelte-config",
            Self::FrontendEnv => "frontend-env",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Template ─────────────────────────────────────────────────────────────────

/// An immutable template text identified by its purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    id: TemplateId,
    source: Cow<'static, str>,
}

impl Template {
    /// Template backed by a compile-time string.
    pub const fn from_static(id: TemplateId, source: &'static str) -> Self {
        Self {
            id,
            source: Cow::Borrowed(source),
        }
    }

    pub fn new(id: TemplateId, source: impl Into<String>) -> Self {
        Self {
            id,
            source: Cow::Owned(source.into()),
        }
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        placeholders(&self.source)
    }

    /// Render this template; see [`render`].
    pub fn render(&self, substitutions: &Substitutions) -> Result<String, DomainError> {
        render(&self.source, substitutions)
    }
}

// ── Substitutions ────────────────────────────────────────────────────────────

/// Key → value pairs used to fill placeholders. Keys are unique; inserting
/// an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Substitutions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Self::new();
        for (k, v) in iter {
            subs.insert(k, v);
        }
        subs
    }
}

// ── Renderer ─────────────────────────────────────────────────────────────────

/// Distinct placeholder names found in `template`, in order of first
/// appearance, without the `%%` delimiters.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Replace every `%%NAME%%` token in `template` with its mapped value.
///
/// # Errors
///
/// [`DomainError::MissingPlaceholder`] naming the first token (in order of
/// appearance) that has no value. No partial output is produced.
pub fn render(template: &str, substitutions: &Substitutions) -> Result<String, DomainError> {
    if let Some(missing) = placeholders(template)
        .into_iter()
        .find(|name| !substitutions.contains(name))
    {
        return Err(DomainError::MissingPlaceholder {
            name: missing.to_string(),
        });
    }

    // A closure replacer inserts values as-is: no `$group` expansion and
    // no second pass over the substituted text.
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        caps.get(1)
            .and_then(|m| substitutions.get(m.as_str()))
            .unwrap_or_default()
            .to_string()
    });

    Ok(rendered.into_owned())
}

//! Modules: identity, discovery and the structural gate.
//!
//! A module is any directory below the modules base that contains a manifest
//! file. The set is discovered once at startup and shared as an immutable
//! `Arc<ModuleSet>`; manifests themselves are re-read on every build.

pub mod check;
pub mod discover;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::manifest::{self, Manifest, ManifestError};

pub use check::{StructuralError, check, check_all};
pub use discover::discover;

/// Module identity derived from its path below the modules base.
///
/// `modules/ns/foo` → namespace `ns`, name `foo`; `modules/foo` has an empty
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub namespace: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Derive the id of the module rooted at `root`. `None` for the base itself.
    pub fn from_path(base: &Path, root: &Path) -> Option<Self> {
        let rel = root.strip_prefix(base).ok()?;
        let mut parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let name = parts.pop()?;
        Some(Self::new(parts.join("/"), name))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    pub root: PathBuf,
}

impl Module {
    /// Read and validate the manifest as it is on disk right now.
    pub fn load_manifest(&self, file_name: &str) -> Result<Manifest, ManifestError> {
        manifest::load(&self.root, file_name)
    }
}

/// Snapshot of discovered modules, sorted by id.
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    base: PathBuf,
    modules: Vec<Module>,
}

impl ModuleSet {
    pub fn new(base: PathBuf, mut modules: Vec<Module>) -> Self {
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        Self { base, modules }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == id)
    }

    /// Module with the longest root that encloses `path`.
    pub fn enclosing(&self, path: &Path) -> Option<&Module> {
        self.modules
            .iter()
            .filter(|m| path.starts_with(&m.root))
            .max_by_key(|m| m.root.components().count())
    }
}

impl<'a> IntoIterator for &'a ModuleSet {
    type Item = &'a Module;
    type IntoIter = std::slice::Iter<'a, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

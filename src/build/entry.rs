//! Entry point resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::manifest::Manifest;

/// Compiled side of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Client,
    Server,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Client, Side::Server];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }

    /// Value of `$HOTMOD_PLATFORM`.
    pub const fn platform(self) -> &'static str {
        match self {
            Self::Client => "browser",
            Self::Server => "node",
        }
    }

    /// Bundle path relative to the staging root: `<side>/<side>.js`.
    pub fn bundle(self) -> String {
        format!("{0}/{0}.js", self.as_str())
    }

    fn declared(self, manifest: &Manifest) -> &[String] {
        match self {
            Self::Client => &manifest.exports.client,
            Self::Server => &manifest.exports.server,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry points of `side`, relative to the module root.
///
/// Declared exports win. Otherwise `<side>/index.<ext>` for the first source
/// extension that exists. An empty result means the side is skipped.
pub fn resolve(root: &Path, manifest: &Manifest, side: Side, source_exts: &[String]) -> Vec<String> {
    let declared = side.declared(manifest);
    if !declared.is_empty() {
        return declared.to_vec();
    }

    source_exts
        .iter()
        .map(|ext| format!("{side}/index.{ext}"))
        .find(|candidate| root.join(candidate).is_file())
        .into_iter()
        .collect()
}

/// The module's UI entry point, when declared and present on disk.
pub fn ui_entry(root: &Path, manifest: &Manifest) -> Option<PathBuf> {
    let entry = root.join(manifest.ui.as_deref()?);
    entry.is_file().then_some(entry)
}

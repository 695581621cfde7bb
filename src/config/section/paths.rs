//! `[paths]` section configuration.
//!
//! ```toml
//! [paths]
//! modules = "modules"        # Base directory searched for module manifests
//! foundation = "core"        # Foundation module (shared server utilities)
//! frontend = "web"           # Shared front-end sources
//! output = "dist"            # Canonical output root loaded by the host
//! mirror = "server/resources/[dev]"  # Host's generated resource mirror (optional)
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::path::normalize_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub modules: PathBuf,
    pub foundation: PathBuf,
    pub frontend: PathBuf,
    pub output: PathBuf,
    pub mirror: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            modules: "modules".into(),
            foundation: "core".into(),
            frontend: "web".into(),
            output: "dist".into(),
            mirror: None,
        }
    }
}

impl PathsConfig {
    /// Resolve every path against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.modules = normalize_path(&root.join(&self.modules));
        self.foundation = normalize_path(&root.join(&self.foundation));
        self.frontend = normalize_path(&root.join(&self.frontend));
        self.output = normalize_path(&root.join(&self.output));
        self.mirror = self.mirror.take().map(|m| normalize_path(&root.join(m)));
    }
}

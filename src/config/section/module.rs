//! `[module]` section configuration.
//!
//! ```toml
//! [module]
//! manifest = "module.json"
//! required_dirs = ["client", "server", "locales", "ui", "types"]
//! ```

use serde::{Deserialize, Serialize};

/// What makes a directory a module and what it must contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleLayoutConfig {
    /// Manifest file name; its presence marks a module root.
    pub manifest: String,

    /// Subdirectories every module must have.
    pub required_dirs: Vec<String>,
}

impl Default for ModuleLayoutConfig {
    fn default() -> Self {
        Self {
            manifest: "module.json".into(),
            required_dirs: ["client", "server", "locales", "ui", "types"]
                .map(String::from)
                .to_vec(),
        }
    }
}

//! `[frontend]` section configuration.
//!
//! The shared front-end bundles every module's UI entry point into one unit.
//!
//! ```toml
//! [frontend]
//! name = "ui"                          # Output subdirectory and host unit name
//! command = ["npx", "vite", "build", "--outDir", "$HOTMOD_OUT_DIR"]
//! ```
//!
//! An empty `command` disables the shared front-end target.

use serde::{Deserialize, Serialize};

use super::check_command;
use crate::config::types::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub name: String,
    pub command: Vec<String>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            name: "ui".into(),
            command: Vec::new(),
        }
    }
}

impl FrontendConfig {
    const NAME: FieldPath = FieldPath::new("frontend.name");
    const COMMAND: FieldPath = FieldPath::new("frontend.command");

    pub fn is_enabled(&self) -> bool {
        !self.command.is_empty()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.is_empty() || self.name.contains(['/', '\\']) || self.name.starts_with('.') {
            diag.error(Self::NAME, format!("`{}` is not a valid directory name", self.name));
        }
        if self.is_enabled() {
            check_command(&self.command, Self::COMMAND, diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::config::types::ConfigDiagnostics;

    #[test]
    fn test_frontend_disabled_by_default() {
        let config = test_parse_config("");
        assert!(!config.frontend.is_enabled());
        assert_eq!(config.frontend.name, "ui");
    }

    #[test]
    fn test_frontend_invalid_name() {
        let config = test_parse_config("[frontend]\nname = \"../ui\"");
        let mut diag = ConfigDiagnostics::new();
        config.frontend.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}

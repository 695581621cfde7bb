//! `[reload]` section configuration.
//!
//! ```toml
//! [reload]
//! enable = true
//! port = 3414                               # WebSocket port for live reload
//! restart_command = ["./restart-host.sh"]   # Run after each broadcast (optional)
//! ```

use serde::{Deserialize, Serialize};

use super::check_command;
use crate::config::types::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    pub enable: bool,
    pub port: u16,
    pub restart_command: Vec<String>,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enable: true,
            port: 3414,
            restart_command: Vec::new(),
        }
    }
}

impl ReloadConfig {
    const RESTART_COMMAND: FieldPath = FieldPath::new("reload.restart_command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.restart_command.is_empty() {
            check_command(&self.restart_command, Self::RESTART_COMMAND, diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_reload_defaults() {
        let config = test_parse_config("");
        assert!(config.reload.enable);
        assert_eq!(config.reload.port, 3414);
        assert!(config.reload.restart_command.is_empty());
    }

    #[test]
    fn test_reload_partial_override() {
        let config = test_parse_config("[reload]\nport = 4000");
        assert_eq!(config.reload.port, 4000);
        assert!(config.reload.enable);
    }
}

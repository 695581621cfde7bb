//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! debounce_ms = 100             # Quiet period before a target is rebuilt
//! ignore = ["coverage"]         # Extra directory names never watched
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};

/// Directory names that never trigger a build.
pub const DEFAULT_IGNORED: &[&str] = &["node_modules", ".hotmod", ".git"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub debounce_ms: u64,
    pub ignore: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            ignore: Vec::new(),
        }
    }
}

impl WatchConfig {
    const DEBOUNCE_MS: FieldPath = FieldPath::new("watch.debounce_ms");

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Built-in ignored names plus the configured ones.
    pub fn ignored_names(&self) -> Vec<String> {
        DEFAULT_IGNORED
            .iter()
            .map(|s| s.to_string())
            .chain(self.ignore.iter().cloned())
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.warn(
                Self::DEBOUNCE_MS,
                "0 disables debouncing; every event starts a build",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::time::Duration;

    #[test]
    fn test_watch_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.watch.debounce(), Duration::from_millis(100));
        assert!(config.watch.ignored_names().contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_watch_extra_ignore() {
        let config = test_parse_config("[watch]\nignore = [\"coverage\"]");
        let names = config.watch.ignored_names();
        assert!(names.contains(&"coverage".to_string()));
        assert!(names.contains(&".hotmod".to_string()));
    }
}

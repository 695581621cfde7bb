//! `[lifecycle]` section configuration.
//!
//! The host process exposes an HTTP API for listing, starting and restarting
//! units. Requests carry a bearer token.
//!
//! ```toml
//! [lifecycle]
//! enable = true
//! url = "http://127.0.0.1:30120/hotmod"
//! token = "$HOTMOD_TOKEN"        # `~` and `$VAR` are expanded
//! # token_env = "HOTMOD_TOKEN"   # or read from an environment variable
//! ```

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::config::util::expand;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub enable: bool,
    pub url: Option<String>,
    pub token: Option<String>,
    pub token_env: Option<String>,
}

impl LifecycleConfig {
    const URL: FieldPath = FieldPath::new("lifecycle.url");
    const TOKEN: FieldPath = FieldPath::new("lifecycle.token");

    /// Bearer token: explicit `token` (expanded) wins over `token_env`.
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = &self.token {
            return Some(expand(token));
        }
        self.token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }

        match self.url.as_deref() {
            None | Some("") => diag.error_with_hint(
                Self::URL,
                "lifecycle is enabled but no url is set",
                "set lifecycle.url or set lifecycle.enable = false",
            ),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                diag.error(Self::URL, format!("`{url}` is not an http(s) url"));
            }
            Some(_) => {}
        }

        if self.token.is_none() && self.token_env.is_none() {
            diag.error(Self::TOKEN, "lifecycle is enabled but no token is configured");
        } else if self.resolve_token().is_none_or(|t| t.is_empty()) {
            diag.warn(Self::TOKEN, "token resolves to an empty value");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::config::types::ConfigDiagnostics;

    #[test]
    fn test_lifecycle_disabled_skips_validation() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.lifecycle.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_lifecycle_enabled_requires_url_and_token() {
        let config = test_parse_config("[lifecycle]\nenable = true");
        let mut diag = ConfigDiagnostics::new();
        config.lifecycle.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_lifecycle_rejects_non_http_url() {
        let config =
            test_parse_config("[lifecycle]\nenable = true\nurl = \"ftp://host\"\ntoken = \"t\"");
        let mut diag = ConfigDiagnostics::new();
        config.lifecycle.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_lifecycle_literal_token() {
        let config = test_parse_config("[lifecycle]\ntoken = \"secret\"");
        assert_eq!(config.lifecycle.resolve_token().as_deref(), Some("secret"));
    }
}

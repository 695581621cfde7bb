//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! # Compiler invoked once per side. `$HOTMOD_ENTRIES` expands to the entry
//! # points, other `$HOTMOD_*` variables are substituted in place.
//! command = ["npx", "esbuild", "$HOTMOD_ENTRIES", "--bundle",
//!            "--platform=$HOTMOD_PLATFORM", "--outfile=$HOTMOD_OUT_FILE"]
//! source_exts = ["ts", "tsx"]     # Compiler inputs (never copied as assets)
//! script_exts = ["lua", "js"]     # Copied files listed as scripts in the host manifest
//! host_manifest = "fxmanifest.lua"
//!
//! [build.header]                  # Extra top-level keys written first
//! fx_version = "cerulean"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::check_command;
use crate::config::types::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub command: Vec<String>,
    pub source_exts: Vec<String>,
    pub script_exts: Vec<String>,
    pub host_manifest: String,
    pub header: BTreeMap<String, String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: [
                "npx",
                "esbuild",
                "$HOTMOD_ENTRIES",
                "--bundle",
                "--platform=$HOTMOD_PLATFORM",
                "--outfile=$HOTMOD_OUT_FILE",
            ]
            .map(String::from)
            .to_vec(),
            source_exts: ["ts", "tsx"].map(String::from).to_vec(),
            script_exts: ["lua", "js"].map(String::from).to_vec(),
            host_manifest: "fxmanifest.lua".into(),
            header: BTreeMap::new(),
        }
    }
}

impl BuildConfig {
    const COMMAND: FieldPath = FieldPath::new("build.command");
    const SOURCE_EXTS: FieldPath = FieldPath::new("build.source_exts");
    const HOST_MANIFEST: FieldPath = FieldPath::new("build.host_manifest");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        check_command(&self.command, Self::COMMAND, diag);

        if self.source_exts.is_empty() {
            diag.error(Self::SOURCE_EXTS, "at least one source extension is required");
        }

        if self.host_manifest.is_empty() || self.host_manifest.contains(['/', '\\']) {
            diag.error(
                Self::HOST_MANIFEST,
                format!("`{}` must be a plain file name", self.host_manifest),
            );
        }
    }

    /// Whether `ext` is a compiler input.
    pub fn is_source_ext(&self, ext: &str) -> bool {
        self.source_exts.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Whether a copied file with `ext` is listed as a script.
    pub fn is_script_ext(&self, ext: &str) -> bool {
        self.script_exts.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::config::types::ConfigDiagnostics;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.host_manifest, "fxmanifest.lua");
        assert!(config.build.is_source_ext("TS"));
        assert!(!config.build.is_source_ext("lua"));
        assert!(config.build.is_script_ext("lua"));
    }

    #[test]
    fn test_build_header_table() {
        let config = test_parse_config("[build.header]\nfx_version = \"cerulean\"\ngame = \"gta5\"");
        assert_eq!(config.build.header.get("game").map(String::as_str), Some("gta5"));
    }

    #[test]
    fn test_build_validate_collects_all() {
        let config = test_parse_config(
            "[build]\ncommand = []\nsource_exts = []\nhost_manifest = \"a/b.lua\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }
}

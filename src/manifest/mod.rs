//! Module manifest: parsing and schema validation.
//!
//! A manifest is the JSON file at the root of every module (default
//! `module.json`). It is validated against a fixed schema before any build;
//! every violation is reported, not just the first.
//!
//! ```json
//! {
//!   "name": "foo",
//!   "version": "1.0.0",
//!   "dependencies": ["core"],
//!   "exports": { "server": ["server/main.ts"] },
//!   "shared": ["shared/config.lua"],
//!   "ui": "ui/index.html"
//! }
//! ```

pub mod host;
mod schema;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated module manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub exports: Exports,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Declared shared scripts, relative to the module root.
    #[serde(default)]
    pub shared: Vec<String>,
    /// UI entry point, relative to the module root.
    #[serde(default)]
    pub ui: Option<String>,
}

/// Explicit entry points per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exports {
    #[serde(default)]
    pub client: Vec<String>,
    #[serde(default)]
    pub server: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed manifest: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("manifest violates schema: {}", .0.join("; "))]
    Schema(Vec<String>),
}

impl ManifestError {
    /// One message per problem, for aggregated reports.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Schema(violations) => violations.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Parse and validate raw manifest bytes.
pub fn validate(raw: &[u8]) -> Result<Manifest, ManifestError> {
    let value: serde_json::Value = serde_json::from_slice(raw).map_err(ManifestError::Parse)?;

    let violations = schema::violations(&value);
    if !violations.is_empty() {
        return Err(ManifestError::Schema(violations));
    }

    serde_json::from_value(value).map_err(ManifestError::Parse)
}

/// Read `<root>/<file_name>` and validate it.
pub fn load(root: &Path, file_name: &str) -> Result<Manifest, ManifestError> {
    let path = root.join(file_name);
    let raw = std::fs::read(&path).map_err(|e| ManifestError::Io(path, e))?;
    validate(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest() {
        let manifest = validate(br#"{"name":"foo","version":"1.0.0"}"#).unwrap();
        assert_eq!(manifest.name, "foo");
        assert_eq!(manifest.version, "1.0.0");
        assert!(manifest.exports.client.is_empty());
        assert!(manifest.ui.is_none());
    }

    #[test]
    fn test_full_manifest() {
        let raw = br#"{
            "name": "foo",
            "version": "2.1.0",
            "description": "Foo module",
            "author": "someone",
            "dependencies": ["core"],
            "exports": { "client": ["client/a.ts"], "server": ["server/b.ts"] },
            "permissions": ["admin"],
            "shared": ["shared/config.lua"],
            "ui": "ui/index.html"
        }"#;
        let manifest = validate(raw).unwrap();
        assert_eq!(manifest.dependencies, vec!["core"]);
        assert_eq!(manifest.exports.server, vec!["server/b.ts"]);
        assert_eq!(manifest.ui.as_deref(), Some("ui/index.html"));
    }

    #[test]
    fn test_unknown_fields_permitted() {
        let manifest = validate(br#"{"name":"foo","version":"1.0.0","extra":{"x":1}}"#).unwrap();
        assert_eq!(manifest.name, "foo");
    }

    #[test]
    fn test_malformed_is_parse_error() {
        let err = validate(b"{ name: foo").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
        assert_eq!(err.messages().len(), 1);
    }

    #[test]
    fn test_every_violation_reported() {
        // missing name, missing version, description of wrong type
        let err = validate(br#"{"description": 5}"#).unwrap_err();
        let ManifestError::Schema(violations) = err else {
            panic!("expected schema error");
        };
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_violations_in_nested_fields() {
        // bad version pattern, non-string dependency, exports.client not an array
        let raw = br#"{
            "name": "foo",
            "version": "one",
            "dependencies": [1],
            "exports": { "client": "client/index.ts" }
        }"#;
        let ManifestError::Schema(violations) = validate(raw).unwrap_err() else {
            panic!("expected schema error");
        };
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load(dir.path(), "module.json").unwrap_err();
        assert!(matches!(err, ManifestError::Io(..)));
    }
}

//! Structural gate: manifest present and valid, required directories exist,
//! and no two build targets share an output directory or host unit.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use owo_colors::OwoColorize;

use super::{ModuleId, ModuleSet};
use crate::config::ModuleLayoutConfig;
use crate::manifest;
use crate::utils::{path::display_relative, plural_count};

pub const MISSING_MANIFEST: &str = "missing manifest";

/// Every structural problem of the module at `root`; empty means valid.
pub fn check(root: &Path, layout: &ModuleLayoutConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if root.join(&layout.manifest).is_file() {
        if let Err(err) = manifest::load(root, &layout.manifest) {
            errors.extend(err.messages());
        }
    } else {
        errors.push(MISSING_MANIFEST.to_string());
    }

    for dir in &layout.required_dirs {
        if !root.join(dir).is_dir() {
            errors.push(format!("missing directory: {dir}"));
        }
    }

    errors
}

/// Top-level output directory of `id`: its first namespace segment, or its
/// name when it has none.
fn output_top(id: &ModuleId) -> &str {
    id.namespace
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or(&id.name)
}

/// Output and unit clashes of every module.
///
/// `reserved` holds the names owned by the foundation and the front-end; each
/// is both a top-level output directory and a host unit.
fn collisions<'a>(
    modules: &'a ModuleSet,
    reserved: &[String],
) -> BTreeMap<&'a ModuleId, Vec<String>> {
    let is_reserved = |name: &str| reserved.iter().any(|r| r == name);
    let mut by_unit: BTreeMap<&str, Vec<&ModuleId>> = BTreeMap::new();
    for module in modules {
        by_unit.entry(&module.id.name).or_default().push(&module.id);
    }

    let mut found: BTreeMap<&'a ModuleId, Vec<String>> = BTreeMap::new();
    for module in modules {
        let id = &module.id;
        let top = output_top(id);
        if is_reserved(top) {
            found
                .entry(id)
                .or_default()
                .push(format!("output directory `{top}` is reserved"));
        }
        if top != id.name && is_reserved(&id.name) {
            found
                .entry(id)
                .or_default()
                .push(format!("host unit `{}` is reserved", id.name));
        }
        let others: Vec<String> = by_unit[id.name.as_str()]
            .iter()
            .filter(|other| **other != id)
            .map(ToString::to_string)
            .collect();
        if !others.is_empty() {
            found.entry(id).or_default().push(format!(
                "host unit `{}` also used by {}",
                id.name,
                others.join(", ")
            ));
        }
    }
    found
}

/// Check every module, failing with all violations of all modules at once.
pub fn check_all(
    modules: &ModuleSet,
    layout: &ModuleLayoutConfig,
    reserved: &[String],
) -> Result<(), StructuralError> {
    let mut report = StructuralError::default();
    let mut clashes = collisions(modules, reserved);

    for module in modules {
        let mut errors = check(&module.root, layout);
        errors.extend(clashes.remove(&module.id).unwrap_or_default());
        if !errors.is_empty() {
            report
                .modules
                .insert(display_relative(&module.root, modules.base()), errors);
        }
    }

    if report.modules.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}

/// Violations grouped by module path.
#[derive(Debug, Default)]
pub struct StructuralError {
    pub modules: BTreeMap<String, Vec<String>>,
}

impl StructuralError {
    pub fn error_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    /// Print the grouped report to stderr.
    pub fn print(&self) {
        for (path, errors) in &self.modules {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for error in errors {
                eprintln!("{} {}", "→".red(), error);
            }
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {}",
            plural_count(self.error_count(), "structural error"),
            plural_count(self.modules.len(), "module")
        )?;
        for (path, errors) in &self.modules {
            write!(f, "\n{path}: {}", errors.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::discover::scan;
    use std::fs;
    use tempfile::TempDir;

    fn layout() -> ModuleLayoutConfig {
        ModuleLayoutConfig::default()
    }

    fn reserved() -> Vec<String> {
        vec!["core".to_string(), "ui".to_string()]
    }

    fn complete_module(root: &Path) {
        for dir in ["client", "server", "locales", "ui", "types"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("module.json"), r#"{"name":"foo","version":"1.0.0"}"#).unwrap();
    }

    #[test]
    fn test_complete_module_is_valid() {
        let dir = TempDir::new().unwrap();
        complete_module(dir.path());
        assert!(check(dir.path(), &layout()).is_empty());
    }

    #[test]
    fn test_missing_manifest_single_error() {
        let dir = TempDir::new().unwrap();
        complete_module(dir.path());
        fs::remove_file(dir.path().join("module.json")).unwrap();

        assert_eq!(check(dir.path(), &layout()), vec![MISSING_MANIFEST]);
    }

    #[test]
    fn test_each_missing_directory_reported() {
        let dir = TempDir::new().unwrap();
        complete_module(dir.path());
        fs::remove_dir(dir.path().join("ui")).unwrap();
        fs::remove_dir(dir.path().join("types")).unwrap();

        assert_eq!(
            check(dir.path(), &layout()),
            vec!["missing directory: ui", "missing directory: types"]
        );
    }

    #[test]
    fn test_schema_violations_all_reported() {
        let dir = TempDir::new().unwrap();
        complete_module(dir.path());
        fs::write(dir.path().join("module.json"), r#"{"author": 1}"#).unwrap();

        // name, version, author
        assert_eq!(check(dir.path(), &layout()).len(), 3);
    }

    #[test]
    fn test_check_all_aggregates_every_module() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        complete_module(&base.join("good"));
        complete_module(&base.join("ns/bad"));
        fs::remove_dir(base.join("ns/bad/client")).unwrap();
        complete_module(&base.join("worse"));
        fs::write(base.join("worse/module.json"), "{").unwrap();
        fs::remove_dir(base.join("worse/server")).unwrap();

        let modules = scan(base, "module.json", &[], &[]);
        let err = check_all(&modules, &layout(), &reserved()).unwrap_err();

        let paths: Vec<_> = err.modules.keys().cloned().collect();
        assert_eq!(paths, ["ns/bad", "worse"]);
        assert_eq!(err.error_count(), 3);
        assert!(err.to_string().starts_with("3 structural errors in 2 modules"));
    }

    #[test]
    fn test_check_all_manifest_removed_after_discovery() {
        let dir = TempDir::new().unwrap();
        complete_module(&dir.path().join("foo"));
        let modules = scan(dir.path(), "module.json", &[], &[]);
        fs::remove_file(dir.path().join("foo/module.json")).unwrap();

        let err = check_all(&modules, &layout(), &reserved()).unwrap_err();
        assert_eq!(err.modules["foo"], vec![MISSING_MANIFEST]);
    }

    #[test]
    fn test_check_all_passes() {
        let dir = TempDir::new().unwrap();
        complete_module(&dir.path().join("foo"));
        let modules = scan(dir.path(), "module.json", &[], &[]);
        assert!(check_all(&modules, &layout(), &reserved()).is_ok());
    }

    #[test]
    fn test_check_all_rejects_reserved_output_directories() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        complete_module(&base.join("core"));
        complete_module(&base.join("ui/foo"));
        complete_module(&base.join("ns/ui"));
        complete_module(&base.join("ns/bar"));

        let modules = scan(base, "module.json", &[], &[]);
        let err = check_all(&modules, &layout(), &reserved()).unwrap_err();

        assert_eq!(err.modules["core"], ["output directory `core` is reserved"]);
        assert_eq!(err.modules["ui/foo"], ["output directory `ui` is reserved"]);
        assert_eq!(err.modules["ns/ui"], ["host unit `ui` is reserved"]);
        assert!(!err.modules.contains_key("ns/bar"));
    }

    #[test]
    fn test_check_all_rejects_shared_unit_names() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        complete_module(&base.join("a/foo"));
        complete_module(&base.join("b/foo"));
        complete_module(&base.join("foo"));
        complete_module(&base.join("a/bar"));

        let modules = scan(base, "module.json", &[], &[]);
        let err = check_all(&modules, &layout(), &reserved()).unwrap_err();

        let paths: Vec<_> = err.modules.keys().cloned().collect();
        assert_eq!(paths, ["a/foo", "b/foo", "foo"]);
        assert_eq!(err.modules["a/foo"], ["host unit `foo` also used by foo, b/foo"]);
        assert_eq!(err.modules["foo"], ["host unit `foo` also used by a/foo, b/foo"]);
    }
}

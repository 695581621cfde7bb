//! Module discovery.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{Module, ModuleId, ModuleSet};
use crate::config::ProjectConfig;
use crate::debug;
use crate::utils::path::has_component;

/// Discover every module below the configured modules base.
///
/// The foundation and the output root are never modules, even when they sit
/// inside the base.
pub fn discover(config: &ProjectConfig) -> ModuleSet {
    let excluded = [config.paths.foundation.as_path(), config.paths.output.as_path()];
    let set = scan(
        &config.paths.modules,
        &config.module.manifest,
        &config.watch.ignored_names(),
        &excluded,
    );
    debug!("discover"; "found {} module(s) in {}", set.len(), config.paths.modules.display());
    set
}

/// Walk `base` for directories containing `manifest_name`.
///
/// Directories named in `ignored` are skipped. A module nested inside another
/// module is not a module of its own.
pub fn scan(base: &Path, manifest_name: &str, ignored: &[String], excluded: &[&Path]) -> ModuleSet {
    if !base.is_dir() {
        return ModuleSet::new(base.to_path_buf(), Vec::new());
    }

    let mut roots: Vec<PathBuf> = WalkDir::new(base)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == manifest_name)
        .filter_map(|e| e.path().parent().map(Path::to_path_buf))
        .filter(|root| root != base && !has_component(root, base, ignored))
        .filter(|root| !excluded.iter().any(|ex| root.starts_with(ex)))
        .collect();

    roots.sort();
    let mut outermost: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        if !outermost.iter().any(|outer| root.starts_with(outer)) {
            outermost.push(root);
        }
    }

    let modules = outermost
        .into_iter()
        .filter_map(|root| {
            let id = ModuleId::from_path(base, &root)?;
            Some(Module { id, root })
        })
        .collect();

    ModuleSet::new(base.to_path_buf(), modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch_manifest(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("module.json"), r#"{"name":"x","version":"1.0.0"}"#).unwrap();
    }

    fn ignored() -> Vec<String> {
        ["node_modules", ".hotmod", ".git"].map(String::from).to_vec()
    }

    #[test]
    fn test_scan_finds_namespaced_modules() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        touch_manifest(&base.join("ns/foo"));
        touch_manifest(&base.join("bar"));
        fs::create_dir_all(base.join("empty/dir")).unwrap();

        let set = scan(base, "module.json", &ignored(), &[]);
        let ids: Vec<_> = set.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, ["bar", "ns/foo"]);
    }

    #[test]
    fn test_scan_skips_ignored_and_excluded() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        touch_manifest(&base.join("foo"));
        touch_manifest(&base.join("foo/node_modules/dep"));
        touch_manifest(&base.join("node_modules/pkg"));
        touch_manifest(&base.join("dist/foo"));

        let dist = base.join("dist");
        let set = scan(base, "module.json", &ignored(), &[dist.as_path()]);
        let ids: Vec<_> = set.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, ["foo"]);
    }

    #[test]
    fn test_nested_module_belongs_to_outer() {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        touch_manifest(&base.join("outer"));
        touch_manifest(&base.join("outer/client/inner"));

        let set = scan(base, "module.json", &ignored(), &[]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_base_is_empty() {
        let dir = TempDir::new().unwrap();
        let set = scan(&dir.path().join("nope"), "module.json", &ignored(), &[]);
        assert!(set.is_empty());
    }
}

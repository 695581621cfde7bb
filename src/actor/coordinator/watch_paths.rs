use std::path::PathBuf;

use crate::config::ProjectConfig;

/// Modules base, foundation, front-end and mirror roots.
///
/// Missing roots are kept: the watcher attaches them once they appear.
pub(super) fn collect_watch_paths(config: &ProjectConfig) -> Vec<PathBuf> {
    let paths = &config.paths;
    let mut roots = vec![
        paths.modules.clone(),
        paths.foundation.clone(),
        paths.frontend.clone(),
    ];
    roots.extend(paths.mirror.clone());

    dedupe_nested(&mut roots);
    roots
}

/// Drop roots already covered by a recursive watch on an ancestor.
fn dedupe_nested(paths: &mut Vec<PathBuf>) {
    paths.sort();
    paths.dedup();
    let snapshot = paths.clone();
    paths.retain(|path| {
        !snapshot
            .iter()
            .any(|other| other != path && path.starts_with(other))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;

    #[test]
    fn test_default_roots() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "[paths]\nmirror = \"server-data/resources\"");
        let root = crate::utils::path::normalize_path(dir.path());

        let paths = collect_watch_paths(&config);
        assert_eq!(paths.len(), 4);
        assert!(paths.contains(&root.join("modules")));
        assert!(paths.contains(&root.join("core")));
        assert!(paths.contains(&root.join("web")));
        assert!(paths.contains(&root.join("server-data/resources")));
    }

    #[test]
    fn test_nested_roots_collapse() {
        let mut paths = vec![
            PathBuf::from("/p/modules"),
            PathBuf::from("/p/modules/[core]"),
            PathBuf::from("/p/web"),
            PathBuf::from("/p/web"),
        ];
        dedupe_nested(&mut paths);
        assert_eq!(paths, [PathBuf::from("/p/modules"), PathBuf::from("/p/web")]);
    }
}

//! Filesystem path normalization.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`). Falls back to
/// the path itself when absolute, or joined onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Display `path` relative to `root` with forward slashes, falling back to the
/// full path when it lies outside `root`.
pub fn display_relative(path: &Path, root: &Path) -> String {
    let Ok(rel) = path.strip_prefix(root) else {
        return path.display().to_string();
    };
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check whether any component of `path` (below `root`) has one of `names`.
pub fn has_component(path: &Path, root: &Path, names: &[String]) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .any(|c| names.iter().any(|n| c.as_os_str() == n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/project/modules");
        assert_eq!(
            display_relative(Path::new("/project/modules/ns/foo"), root),
            "ns/foo"
        );
        assert_eq!(display_relative(Path::new("/elsewhere/x"), root), "/elsewhere/x");
    }

    #[test]
    fn test_has_component() {
        let root = Path::new("/project");
        let ignore = vec!["node_modules".to_string(), ".hotmod".to_string()];
        assert!(has_component(
            Path::new("/project/modules/foo/node_modules/x.js"),
            root,
            &ignore
        ));
        assert!(!has_component(
            Path::new("/project/modules/foo/client/index.ts"),
            root,
            &ignore
        ));
    }
}

//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory.
///
/// ```text
/// /home/user/project/modules/ns/foo/  ← cwd
/// /home/user/project/hotmod.toml      ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Expand `~` and `$VAR` in a user supplied value.
pub fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_file_absolute_missing() {
        assert!(find_config_file(Path::new("/definitely/not/here/hotmod.toml")).is_none());
    }

    #[test]
    fn test_find_config_file_absolute_existing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hotmod.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }

    #[test]
    fn test_expand_plain_value_unchanged() {
        assert_eq!(expand("plain-token"), "plain-token");
    }
}

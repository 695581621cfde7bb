use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

use crate::config::ProjectConfig;
use crate::utils::path::has_component;

/// Drops events that must never trigger a build.
pub(super) struct EventFilter {
    root: PathBuf,
    output: PathBuf,
    ignored: Vec<String>,
}

impl EventFilter {
    pub(super) fn new(config: &ProjectConfig) -> Self {
        Self {
            root: config.root.clone(),
            output: config.paths.output.clone(),
            ignored: config.watch.ignored_names(),
        }
    }

    /// Create, remove and content/name modifications. Metadata-only changes
    /// (mtime, chmod) are noise.
    pub(super) fn relevant_kind(kind: &EventKind) -> bool {
        match kind {
            EventKind::Create(_) | EventKind::Remove(_) => true,
            EventKind::Modify(modify) => !matches!(modify, ModifyKind::Metadata(_)),
            _ => false,
        }
    }

    pub(super) fn ignores(&self, path: &Path) -> bool {
        is_temp_file(path)
            || path.starts_with(&self.output)
            || has_component(path, &self.root, &self.ignored)
    }
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
        || name == "4913"
}

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use super::WatchError;
use crate::{debug, log};

/// Watch-root consistency manager.
///
/// Responsibility:
/// - Attach existing roots at startup
/// - Attach roots that appear later, or were removed and recreated
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    /// Attach every existing root. A root that fails is reported and skipped;
    /// the others are still watched.
    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> Vec<WatchError> {
        let mut errors = Vec::new();
        for path in &self.desired {
            if !path.exists() {
                debug!("watch"; "not yet present: {}", path.display());
                continue;
            }
            match watcher.watch(path, RecursiveMode::Recursive) {
                Ok(()) => {
                    self.attached.insert(path.clone());
                }
                Err(source) => {
                    let err = WatchError::Attach {
                        path: path.clone(),
                        source,
                    };
                    log!("error"; "{}", err);
                    errors.push(err);
                }
            }
        }
        errors
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        // Drop stale handles for roots that no longer exist.
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }

            if watcher.watch(path, RecursiveMode::Recursive).is_ok() {
                self.attached.insert(path.clone());
                debug!("watch"; "attached watch: {}", path.display());
            }
        }
    }

    #[cfg(test)]
    pub(super) fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

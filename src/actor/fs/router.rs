use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::actor::messages::WatchKey;
use crate::build::BuildTarget;
use crate::config::ProjectConfig;
use crate::log;
use crate::module::ModuleSet;
use crate::utils::path::display_relative;

/// Maps a changed path to the key that debounces it.
///
/// A path inside a module belongs to the module with the longest enclosing
/// root; foundation, front-end and mirror are matched by prefix after that.
pub(super) struct PathRouter {
    modules: Arc<ModuleSet>,
    foundation: PathBuf,
    frontend: PathBuf,
    mirror: Option<PathBuf>,
    manifest: String,
    /// Module roots created after discovery that were already reported.
    reported: Mutex<FxHashSet<PathBuf>>,
}

impl PathRouter {
    pub(super) fn new(config: &ProjectConfig, modules: Arc<ModuleSet>) -> Self {
        Self {
            modules,
            foundation: config.paths.foundation.clone(),
            frontend: config.paths.frontend.clone(),
            mirror: config.paths.mirror.clone(),
            manifest: config.module.manifest.clone(),
            reported: Mutex::new(FxHashSet::default()),
        }
    }

    pub(super) fn route(&self, path: &Path) -> Option<WatchKey> {
        if let Some(module) = self.modules.enclosing(path) {
            return Some(WatchKey::Target(BuildTarget::Module(module.id.clone())));
        }
        if path.starts_with(&self.foundation) {
            return Some(WatchKey::Target(BuildTarget::Foundation));
        }
        if path.starts_with(&self.frontend) {
            return Some(WatchKey::Target(BuildTarget::SharedFrontEnd));
        }
        if self.mirror.as_ref().is_some_and(|m| path.starts_with(m)) {
            return Some(WatchKey::Mirror);
        }
        if let Some(root) = self.new_module_root(path) {
            if self.reported.lock().insert(root.to_path_buf()) {
                log!(
                    "watch";
                    "new module `{}` is not built until watch mode restarts",
                    display_relative(root, self.modules.base())
                );
            }
        }
        None
    }

    /// Root of a module whose manifest appeared after discovery.
    pub(super) fn new_module_root<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        if path.file_name()? != self.manifest.as_str() || self.modules.enclosing(path).is_some() {
            return None;
        }
        let root = path.parent()?;
        (root.starts_with(self.modules.base()) && root != self.modules.base()).then_some(root)
    }

    #[cfg(test)]
    pub(super) fn reported_count(&self) -> usize {
        self.reported.lock().len()
    }
}

//! Build graph executor.
//!
//! # Module Structure
//!
//! ```text
//! build/
//! ├── entry.rs    # Entry point resolution per side
//! ├── stage.rs    # Compile, copy assets, host manifest into staging
//! ├── promote.rs  # Directory swap into the canonical output root
//! ├── graph.rs    # Full pass in tier order
//! └── mod.rs      # BuildTarget, BuildResult, Executor (this file)
//! ```
//!
//! Every target writes only below its own output root. The structural gate
//! rejects modules whose top-level directory or unit name is taken by the
//! foundation or the front-end, so the roots never nest:
//!
//! | Target           | Source root            | Output root                 |
//! |------------------|------------------------|-----------------------------|
//! | `Foundation`     | `paths.foundation`     | `<output>/<foundation dir>` |
//! | `Module(ns/foo)` | `<modules>/ns/foo`     | `<output>/ns/foo`           |
//! | `SharedFrontEnd` | `paths.frontend`       | `<output>/<frontend.name>`  |

pub mod entry;
pub mod graph;
pub mod promote;
pub mod stage;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::ProjectConfig;
use crate::debug;
use crate::manifest::{self, ManifestError, host};
use crate::module::{ModuleId, ModuleSet};
use entry::Side;

pub use graph::{GraphReport, build_all};

/// Dependency tier. Declaration order is build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Foundation,
    Module,
    SharedFrontEnd,
}

impl Tier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Module => "modules",
            Self::SharedFrontEnd => "frontend",
        }
    }
}

/// Something that can be built. Also the scheduler key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildTarget {
    Foundation,
    Module(ModuleId),
    SharedFrontEnd,
}

impl BuildTarget {
    pub const fn tier(&self) -> Tier {
        match self {
            Self::Foundation => Tier::Foundation,
            Self::Module(_) => Tier::Module,
            Self::SharedFrontEnd => Tier::SharedFrontEnd,
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foundation => f.write_str("foundation"),
            Self::Module(id) => write!(f, "{id}"),
            Self::SharedFrontEnd => f.write_str("frontend"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("{label} compiler failed: {detail}")]
    Compile {
        label: String,
        code: Option<i32>,
        detail: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to promote `{}`: {source}", path.display())]
    Promote {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown module `{0}`")]
    UnknownModule(ModuleId),
}

impl BuildError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Outcome of one target build. Failures are values, never panics.
#[derive(Debug)]
pub struct BuildResult {
    pub target: BuildTarget,
    /// Promoted files under the output root.
    pub artifacts: Vec<PathBuf>,
    pub succeeded: bool,
    pub error: Option<BuildError>,
}

impl BuildResult {
    fn from_outcome(target: BuildTarget, outcome: Result<Vec<PathBuf>, BuildError>) -> Self {
        match outcome {
            Ok(artifacts) => Self {
                target,
                artifacts,
                succeeded: true,
                error: None,
            },
            Err(error) => Self {
                target,
                artifacts: Vec::new(),
                succeeded: false,
                error: Some(error),
            },
        }
    }
}

/// Builds targets against an immutable module snapshot.
#[derive(Debug, Clone)]
pub struct Executor {
    config: Arc<ProjectConfig>,
    modules: Arc<ModuleSet>,
}

impl Executor {
    pub fn new(config: Arc<ProjectConfig>, modules: Arc<ModuleSet>) -> Self {
        Self { config, modules }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    /// Canonical output directory of `target`.
    pub fn output_root(&self, target: &BuildTarget) -> PathBuf {
        let output = &self.config.paths.output;
        match target {
            BuildTarget::Foundation => output.join(self.config.foundation_name()),
            BuildTarget::Module(id) => {
                let mut dir = output.clone();
                dir.extend(id.namespace.split('/').filter(|s| !s.is_empty()));
                dir.join(&id.name)
            }
            BuildTarget::SharedFrontEnd => output.join(&self.config.frontend.name),
        }
    }

    /// Name of the host unit loaded from `target`'s output.
    pub fn unit_name(&self, target: &BuildTarget) -> String {
        match target {
            BuildTarget::Foundation => self.config.foundation_name(),
            BuildTarget::Module(id) => id.name.clone(),
            BuildTarget::SharedFrontEnd => self.config.frontend.name.clone(),
        }
    }

    /// Whether module `id` currently declares an existing UI entry.
    pub fn has_ui(&self, id: &ModuleId) -> bool {
        let Some(module) = self.modules.get(id) else {
            return false;
        };
        module
            .load_manifest(&self.config.module.manifest)
            .is_ok_and(|m| entry::ui_entry(&module.root, &m).is_some())
    }

    /// Build on the blocking pool.
    pub async fn build(&self, target: BuildTarget) -> BuildResult {
        let executor = self.clone();
        let task_target = target.clone();
        tokio::task::spawn_blocking(move || executor.build_blocking(&task_target))
            .await
            .unwrap_or_else(|e| {
                BuildResult::from_outcome(
                    target,
                    Err(BuildError::io("build task aborted", std::io::Error::other(e))),
                )
            })
    }

    pub fn build_blocking(&self, target: &BuildTarget) -> BuildResult {
        let live = self.output_root(target);
        let outcome = match target {
            BuildTarget::Foundation => {
                self.build_module(&self.config.paths.foundation, &self.unit_name(target), &live)
            }
            BuildTarget::Module(id) => match self.modules.get(id) {
                Some(module) => self.build_module(&module.root, &id.name, &live),
                None => Err(BuildError::UnknownModule(id.clone())),
            },
            BuildTarget::SharedFrontEnd => self.build_frontend(&live),
        };
        BuildResult::from_outcome(target.clone(), outcome)
    }

    /// Manifest, assets, per-side compile, host manifest, promote.
    fn build_module(&self, root: &Path, name: &str, live: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let config = &self.config;
        let manifest = manifest::load(root, &config.module.manifest)?;
        let ignored = config.watch.ignored_names();

        let stage_dir = root.join(stage::STAGE_DIR);
        stage::prepare(&stage_dir)?;
        let copied = stage::copy_assets(root, &stage_dir, &config.build, &ignored)?;

        let mut compiled = Vec::new();
        for side in Side::ALL {
            let entries = entry::resolve(root, &manifest, side, &config.build.source_exts);
            if entries.is_empty() {
                debug!("stage"; "{name}: no {side} entry, skipped");
                continue;
            }
            let out_dir = stage_dir.join(side.as_str());
            fs::create_dir_all(&out_dir)
                .map_err(|e| BuildError::io(format!("create {}", out_dir.display()), e))?;

            let vars = stage::side_vars(root, &stage_dir, name, side);
            stage::compile(side.as_str(), &config.build.command, root, &entries, &vars)?;
            compiled.push(side);
        }

        let layout = stage::layout(&copied, &compiled, &manifest, &config.build);
        let host_manifest = host::generate(&config.build.header, &manifest, &layout);
        let host_path = stage_dir.join(&config.build.host_manifest);
        fs::write(&host_path, host_manifest.render())
            .map_err(|e| BuildError::io(format!("write {}", host_path.display()), e))?;

        promote::promote(&stage_dir, live)
    }

    /// Bundle every module's UI entry into one unit.
    fn build_frontend(&self, live: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let config = &self.config;
        let frontend = &config.frontend;
        if !frontend.is_enabled() {
            return Ok(Vec::new());
        }

        let entries: Vec<String> = self
            .modules
            .iter()
            .filter_map(|module| {
                let manifest = module.load_manifest(&config.module.manifest).ok()?;
                entry::ui_entry(&module.root, &manifest)
            })
            .map(|path| path.display().to_string())
            .collect();

        let source = &config.paths.frontend;
        let stage_dir = config.root.join(stage::STAGE_DIR).join(&frontend.name);
        stage::prepare(&stage_dir)?;
        if source.is_dir() {
            stage::copy_tree(source, &stage_dir, &config.build, &config.watch.ignored_names())?;
        }

        if entries.is_empty() {
            debug!("stage"; "{}: no module declares a ui entry", frontend.name);
        } else {
            let cwd = if source.is_dir() { source } else { &config.root };
            let mut vars = FxHashMap::default();
            vars.insert("HOTMOD_NAME".to_string(), frontend.name.clone());
            vars.insert("HOTMOD_ROOT".to_string(), cwd.display().to_string());
            vars.insert("HOTMOD_SIDE".to_string(), "ui".to_string());
            vars.insert("HOTMOD_PLATFORM".to_string(), "browser".to_string());
            vars.insert("HOTMOD_OUT_DIR".to_string(), stage_dir.display().to_string());
            vars.insert(
                "HOTMOD_OUT_FILE".to_string(),
                stage_dir.join("index.js").display().to_string(),
            );
            stage::compile("ui", &frontend.command, cwd, &entries, &vars)?;
        }

        promote::promote(&stage_dir, live)
    }
}

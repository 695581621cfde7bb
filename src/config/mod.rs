//! Project configuration (`hotmod.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/   # One file per TOML section
//! ├── types/     # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs    # Config discovery, value expansion
//! └── mod.rs     # ProjectConfig (this file)
//! ```
//!
//! | Section       | Purpose                                       |
//! |---------------|-----------------------------------------------|
//! | `[paths]`     | Modules base, foundation, front-end, output   |
//! | `[module]`    | Manifest file name and required directories   |
//! | `[build]`     | Compiler command and host manifest            |
//! | `[frontend]`  | Shared UI bundle                              |
//! | `[watch]`     | Debounce delay, ignored directory names       |
//! | `[reload]`    | Live-reload port and restart command          |
//! | `[lifecycle]` | Host lifecycle API url and credential         |

pub mod section;
pub mod types;
mod util;

pub use section::{
    BuildConfig, FrontendConfig, LifecycleConfig, ModuleLayoutConfig, PathsConfig, ReloadConfig,
    WatchConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands};
use crate::log;
use crate::utils::path::normalize_path;
use util::find_config_file;

/// Root configuration structure representing hotmod.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub module: ModuleLayoutConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub frontend: FrontendConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub reload: ReloadConfig,

    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl ProjectConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file; its parent directory is
    /// the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.config_path = normalize_path(&config_path);
        config.finalize(&root);
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve root and every configured path to absolute form.
    pub fn finalize(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.paths.normalize(&root);
        self.root = root;
    }

    /// Apply command-specific CLI overrides.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Commands::Watch { port, no_lifecycle } = &cli.command {
            if let Some(port) = port {
                self.reload.port = *port;
            }
            if *no_lifecycle {
                self.lifecycle.enable = false;
            }
        }
        if let Commands::Build { no_lifecycle, .. } = &cli.command
            && *no_lifecycle
        {
            self.lifecycle.enable = false;
        }
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.frontend.validate(&mut diag);
        self.watch.validate(&mut diag);
        self.reload.validate(&mut diag);
        self.lifecycle.validate(&mut diag);
        self.validate_paths(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// The output root must not overlap any source root; a build would
    /// otherwise trigger itself.
    fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        const OUTPUT: FieldPath = FieldPath::new("paths.output");

        let output = &self.paths.output;
        for (name, source) in [
            ("paths.modules", &self.paths.modules),
            ("paths.foundation", &self.paths.foundation),
            ("paths.frontend", &self.paths.frontend),
        ] {
            if output.starts_with(source) || source.starts_with(output) {
                diag.error(
                    OUTPUT,
                    format!("output root overlaps `{name}` ({})", source.display()),
                );
            }
        }
        if output == &self.root {
            diag.error(OUTPUT, "output root cannot be the project root");
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Output directory and host unit name of the foundation.
    pub fn foundation_name(&self) -> String {
        self.paths
            .foundation
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "foundation".to_string())
    }

    /// Top-level output directories and unit names no module may take.
    pub fn reserved_names(&self) -> Vec<String> {
        vec![self.foundation_name(), self.frontend.name.clone()]
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `root` with a no-op compiler, ready for build tests.
#[cfg(test)]
pub fn test_config_at(root: &Path, extra: &str) -> ProjectConfig {
    let mut config = test_parse_config(extra);
    config.config_path = root.join("hotmod.toml");
    config.finalize(root);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(ProjectConfig::parse_with_ignored("[paths\nmodules = \"x\"").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[paths]\nmodules = \"src\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.paths.modules, PathBuf::from("src"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        let root = normalize_path(dir.path());

        assert_eq!(config.get_root(), root);
        assert_eq!(config.paths.output, root.join("dist"));
        assert_eq!(config.paths.modules, root.join("modules"));
    }

    #[test]
    fn test_output_overlapping_sources_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "[paths]\noutput = \"modules/dist\"");

        let mut diag = ConfigDiagnostics::new();
        config.validate_paths(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_default_layout_has_no_overlap() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");

        let mut diag = ConfigDiagnostics::new();
        config.validate_paths(&mut diag);
        assert!(diag.is_empty());
    }
}

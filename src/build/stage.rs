//! Staging: compile, copy assets and write the host manifest into a
//! module-local directory that is later promoted as a whole.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashMap;

use super::BuildError;
use super::entry::Side;
use crate::config::BuildConfig;
use crate::debug;
use crate::manifest::Manifest;
use crate::manifest::host::{SideScripts, StagedLayout};
use crate::utils::exec::{Cmd, resolve_args};
use crate::utils::path::{display_relative, has_component};

/// Staging directory relative to a module root.
pub const STAGE_DIR: &str = ".hotmod/stage";

/// Module subdirectories whose non-source files ship as-is.
pub const ASSET_DIRS: [&str; 5] = ["client", "server", "shared", "locales", "ui"];

/// Empty `dir`, creating it if needed.
pub fn prepare(dir: &Path) -> Result<(), BuildError> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .map_err(|e| BuildError::io(format!("clear {}", dir.display()), e))?;
    }
    fs::create_dir_all(dir).map_err(|e| BuildError::io(format!("create {}", dir.display()), e))
}

/// Run the compiler `command` in `cwd`.
///
/// `vars` are substituted into the arguments and exported to the process.
/// A non-zero exit or a failed spawn is a [`BuildError::Compile`].
pub fn compile(
    label: &str,
    command: &[String],
    cwd: &Path,
    entries: &[String],
    vars: &FxHashMap<String, String>,
) -> Result<(), BuildError> {
    let argv = resolve_args(command, vars, entries);
    debug!("stage"; "{label}: {}", argv.join(" "));

    let outcome = Cmd::from_slice(&argv)
        .cwd(cwd)
        .envs(vars.iter())
        .run()
        .map_err(|e| BuildError::Compile {
            label: label.to_string(),
            code: None,
            detail: format!("{e:#}"),
        })?;

    if outcome.success() {
        Ok(())
    } else {
        Err(BuildError::Compile {
            label: label.to_string(),
            code: outcome.code,
            detail: outcome.describe(),
        })
    }
}

/// Variables for one side of a module build.
pub fn side_vars(root: &Path, stage: &Path, name: &str, side: Side) -> FxHashMap<String, String> {
    let out_dir = stage.join(side.as_str());
    let out_file = stage.join(side.bundle());

    let mut vars = FxHashMap::default();
    vars.insert("HOTMOD_NAME".into(), name.to_string());
    vars.insert("HOTMOD_ROOT".into(), root.display().to_string());
    vars.insert("HOTMOD_SIDE".into(), side.as_str().to_string());
    vars.insert("HOTMOD_PLATFORM".into(), side.platform().to_string());
    vars.insert("HOTMOD_OUT_DIR".into(), out_dir.display().to_string());
    vars.insert("HOTMOD_OUT_FILE".into(), out_file.display().to_string());
    vars
}

/// Copy the non-source files of every asset directory of a module.
pub fn copy_assets(
    root: &Path,
    stage: &Path,
    build: &BuildConfig,
    ignored: &[String],
) -> Result<Vec<String>, BuildError> {
    let mut copied = Vec::new();
    for dir in ASSET_DIRS {
        copied.extend(copy_files(root, &root.join(dir), stage, build, ignored)?);
    }
    Ok(copied)
}

/// Copy every non-source file below `root`.
pub fn copy_tree(
    root: &Path,
    stage: &Path,
    build: &BuildConfig,
    ignored: &[String],
) -> Result<Vec<String>, BuildError> {
    copy_files(root, root, stage, build, ignored)
}

/// Copy non-source files under `from` to `stage`, keeping paths relative to
/// `base`. Returns the copied paths relative to the stage, sorted.
fn copy_files(
    base: &Path,
    from: &Path,
    stage: &Path,
    build: &BuildConfig,
    ignored: &[String],
) -> Result<Vec<String>, BuildError> {
    if !from.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(from)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| !has_component(p, base, ignored))
        .filter(|p| !extension(p).is_some_and(|ext| build.is_source_ext(ext)))
        .collect();
    files.sort();

    let mut copied = Vec::with_capacity(files.len());
    for file in files {
        let rel = display_relative(&file, base);
        let dest = stage.join(&rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BuildError::io(format!("create {}", parent.display()), e))?;
        }
        fs::copy(&file, &dest).map_err(|e| BuildError::io(format!("copy {rel}"), e))?;
        copied.push(rel);
    }
    Ok(copied)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Sort staged files into the host manifest's script lists.
///
/// A declared `shared` list replaces the scripts found under `shared/`.
pub fn layout(
    copied: &[String],
    compiled: &[Side],
    manifest: &Manifest,
    build: &BuildConfig,
) -> StagedLayout {
    let mut layout = StagedLayout::default();

    for rel in copied {
        let is_script = extension(Path::new(rel)).is_some_and(|ext| build.is_script_ext(ext));
        if !is_script {
            layout.files.push(rel.clone());
            continue;
        }
        let top = rel.split('/').next().unwrap_or_default();
        match top {
            "shared" => layout.shared.push(rel.clone()),
            "locales" => layout.locales.push(rel.clone()),
            "client" if *rel != Side::Client.bundle() => layout.client.scripts.push(rel.clone()),
            "server" if *rel != Side::Server.bundle() => layout.server.scripts.push(rel.clone()),
            _ => {}
        }
    }

    if !manifest.shared.is_empty() {
        layout.shared = manifest.shared.clone();
    }

    for side in compiled {
        let scripts = match side {
            Side::Client => &mut layout.client,
            Side::Server => &mut layout.server,
        };
        *scripts = SideScripts {
            compiled: Some(side.bundle()),
            scripts: std::mem::take(&mut scripts.scripts),
        };
    }

    layout
}

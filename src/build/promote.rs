//! Atomic promotion of a staged tree into its canonical output directory.
//!
//! ```text
//! <output>/ns/.foo.incoming   ← copy of the stage
//! <output>/ns/foo             → <output>/ns/.foo.old
//! <output>/ns/.foo.incoming   → <output>/ns/foo
//! <output>/ns/.foo.old        removed
//! ```
//!
//! Readers of `<output>/ns/foo` see either the previous tree or the new one,
//! never a mix.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::BuildError;
use crate::{debug, log};

/// Sibling directory `.<name>.<suffix>` of `live`.
fn sibling(live: &Path, suffix: &str) -> Option<PathBuf> {
    let name = live.file_name()?.to_string_lossy();
    Some(live.with_file_name(format!(".{name}.{suffix}")))
}

fn promote_err(path: &Path, source: io::Error) -> BuildError {
    BuildError::Promote {
        path: path.to_path_buf(),
        source,
    }
}

fn remove_if_exists(dir: &Path) -> Result<(), BuildError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| promote_err(dir, e))?;
    }
    Ok(())
}

/// Replace `live` with the contents of `stage`.
///
/// Leftovers from an interrupted promotion are cleared first. Returns every
/// promoted file under its final path.
pub fn promote(stage: &Path, live: &Path) -> Result<Vec<PathBuf>, BuildError> {
    promote_with(
        stage,
        live,
        |from, to| fs::rename(from, to),
        |dir| fs::remove_dir_all(dir),
    )
}

fn promote_with(
    stage: &Path,
    live: &Path,
    rename: impl Fn(&Path, &Path) -> io::Result<()>,
    remove_old: impl Fn(&Path) -> io::Result<()>,
) -> Result<Vec<PathBuf>, BuildError> {
    let invalid = || {
        promote_err(
            live,
            io::Error::new(io::ErrorKind::InvalidInput, "output has no file name"),
        )
    };
    if !stage.is_dir() {
        return Err(promote_err(
            stage,
            io::Error::new(io::ErrorKind::NotFound, "stage directory missing"),
        ));
    }
    let incoming = sibling(live, "incoming").ok_or_else(invalid)?;
    let old = sibling(live, "old").ok_or_else(invalid)?;

    remove_if_exists(&incoming)?;
    remove_if_exists(&old)?;

    let files = copy_dir(stage, &incoming)?;

    if live.exists() {
        rename(live, &old).map_err(|e| promote_err(live, e))?;
    }
    if let Err(e) = rename(&incoming, live) {
        // put the previous tree back so the output is never left empty
        if old.exists() {
            rename(&old, live).ok();
        }
        return Err(promote_err(live, e));
    }

    // the new tree is live; a stale `.old` is cleared by the next promotion
    if old.exists() {
        if let Err(e) = remove_old(&old) {
            log!("warning"; "could not remove {}: {}", old.display(), e);
        }
    }

    debug!("promote"; "{} file(s) -> {}", files.len(), live.display());
    Ok(files.into_iter().map(|rel| live.join(rel)).collect())
}

/// Recursively copy `from` into a fresh `to`. Returns relative file paths.
fn copy_dir(from: &Path, to: &Path) -> Result<Vec<PathBuf>, BuildError> {
    fs::create_dir_all(to).map_err(|e| promote_err(to, e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(from)
        .skip_hidden(false)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(from) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let dest = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| promote_err(&dest, e))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| promote_err(parent, e))?;
            }
            fs::copy(&path, &dest).map_err(|e| promote_err(&dest, e))?;
            files.push(rel.to_path_buf());
        }
    }
    Ok(files)
}

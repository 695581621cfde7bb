//! External command execution.
//!
//! Builder-based API for running the module compiler, the UI bundler and the
//! restart command. Every run yields a [`CommandOutcome`] (exit code plus
//! captured output) so callers decide what a non-zero exit means.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let outcome = Cmd::from_slice(&["esbuild", "server/index.ts", "--bundle"])
//!     .cwd(module_root)
//!     .envs(&vars)
//!     .run_async()
//!     .await?;
//! if !outcome.success() { /* ... */ }
//! ```

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Default, Clone)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

/// Result of a finished external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short, human readable failure description.
    pub fn describe(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exited with code {code}"),
            None => "terminated by signal".to_string(),
        };
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        if detail.is_empty() {
            status
        } else {
            format!("{status}\n{detail}")
        }
    }
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["npx", "esbuild"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Run to completion, capturing output.
    ///
    /// Only a failure to spawn is an `Err`; a non-zero exit is reported through
    /// the returned outcome.
    pub fn run(self) -> Result<CommandOutcome> {
        let name = self.program_name();
        if self.program.is_empty() {
            anyhow::bail!("empty command");
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(self.envs.iter().cloned());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("failed to execute `{name}`"))?;

        Ok(CommandOutcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run on the blocking pool so the event loop keeps serving other events.
    pub async fn run_async(self) -> Result<CommandOutcome> {
        let name = self.program_name();
        tokio::task::spawn_blocking(move || self.run())
            .await
            .with_context(|| format!("`{name}` task panicked"))?
    }
}

// ============================================================================
// Argument Resolution
// ============================================================================

/// Variable whose argument expands to one argument per entry point.
pub const ENTRIES_VAR: &str = "$HOTMOD_ENTRIES";

/// Resolve `$HOTMOD_*` variables in command arguments.
///
/// An argument exactly equal to [`ENTRIES_VAR`] is replaced by `entries`,
/// one argument each; other variables are substituted in place.
pub fn resolve_args(
    args: &[String],
    vars: &FxHashMap<String, String>,
    entries: &[String],
) -> Vec<String> {
    // Longest names first so `$HOTMOD_OUT_FILE` is not eaten by `$HOTMOD_OUT`.
    let mut keys: Vec<_> = vars.iter().collect();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut resolved = Vec::with_capacity(args.len() + entries.len());
    for arg in args {
        if arg == ENTRIES_VAR {
            resolved.extend(entries.iter().cloned());
            continue;
        }
        let mut result = arg.clone();
        for (key, value) in &keys {
            result = result.replace(&format!("${key}"), value.as_str());
        }
        resolved.push(result);
    }
    resolved
}

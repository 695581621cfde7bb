//! Configuration section definitions.
//!
//! Each module corresponds to a section in `hotmod.toml`:
//!
//! | Module      | TOML Section  | Purpose                                  |
//! |-------------|---------------|------------------------------------------|
//! | `paths`     | `[paths]`     | Source roots and canonical output root   |
//! | `module`    | `[module]`    | Manifest file name, required directories |
//! | `build`     | `[build]`     | Compiler command, host manifest          |
//! | `frontend`  | `[frontend]`  | Shared UI bundle                         |
//! | `watch`     | `[watch]`     | Debounce and ignore rules                |
//! | `reload`    | `[reload]`    | Live-reload server, restart command      |
//! | `lifecycle` | `[lifecycle]` | Host lifecycle API                       |

mod build;
mod frontend;
mod lifecycle;
mod module;
mod paths;
mod reload;
mod watch;

pub use build::BuildConfig;
pub use frontend::FrontendConfig;
pub use lifecycle::LifecycleConfig;
pub use module::ModuleLayoutConfig;
pub use paths::PathsConfig;
pub use reload::ReloadConfig;
pub use watch::WatchConfig;

use super::types::{ConfigDiagnostics, FieldPath};

/// Check that the program of a configured command can be found.
///
/// Package runners download on demand, so a missing package is only hinted.
pub(crate) fn check_command(command: &[String], field: FieldPath, diag: &mut ConfigDiagnostics) {
    let Some(program) = command.first() else {
        diag.error(field, format!("{} is empty", field.as_str()));
        return;
    };

    if which::which(program).is_ok() {
        return;
    }

    let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "pnpm"].contains(&program.as_str());
    if is_package_runner {
        diag.warn(field, format!("`{program}` not found on PATH"));
    } else {
        diag.error_with_hint(
            field,
            format!("`{program}` not found"),
            format!("install the command or update {}", field.as_str()),
        );
    }
}

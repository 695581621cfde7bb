//! Structural check command.

use std::sync::Arc;

use anyhow::Result;

use crate::config::ProjectConfig;
use crate::log;
use crate::module::{ModuleSet, check_all, discover};
use crate::utils::plural_count;

/// Discover modules and run the structural gate over all of them.
///
/// Every problem is printed before failing.
pub fn check_modules(config: &ProjectConfig) -> Result<Arc<ModuleSet>> {
    let modules = discover(config);
    log!("check"; "found {}", plural_count(modules.len(), "module"));

    if let Err(err) = check_all(&modules, &config.module, &config.reserved_names()) {
        err.print();
        return Err(err.into());
    }
    Ok(Arc::new(modules))
}

pub fn run(config: &ProjectConfig) -> Result<()> {
    check_modules(config)?;
    log!("check"; "all modules ok");
    Ok(())
}

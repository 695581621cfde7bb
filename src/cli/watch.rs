//! Watch command: initial build, then rebuild on change until Ctrl+C.

use std::sync::Arc;

use anyhow::Result;

use super::check::check_modules;
use crate::actor::Coordinator;
use crate::config::ProjectConfig;
use crate::core::register_shutdown;

pub fn run(config: Arc<ProjectConfig>) -> Result<()> {
    let modules = check_modules(&config)?;

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    register_shutdown(shutdown_tx);

    super::runtime()?.block_on(
        Coordinator::new(config, modules)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    )
}

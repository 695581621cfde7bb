//! One-shot build command.

use std::sync::Arc;

use anyhow::{Result, bail};

use super::check::check_modules;
use crate::build::{Executor, build_all};
use crate::config::ProjectConfig;
use crate::lifecycle::{LifecycleApi, LifecycleClient};
use crate::log;

/// Check, build every target in tier order, then optionally restart every
/// host unit.
pub fn run(config: Arc<ProjectConfig>, restart: bool) -> Result<()> {
    let modules = check_modules(&config)?;
    let executor = Executor::new(Arc::clone(&config), modules);

    super::runtime()?.block_on(async {
        let report = build_all(&executor).await;
        report.log_summary();
        if !report.is_success() {
            bail!("build failed");
        }

        if restart {
            restart_all(&config).await;
        }
        Ok(())
    })
}

/// Ask the host to restart everything. Reported, never fatal.
async fn restart_all(config: &ProjectConfig) {
    let client = match LifecycleClient::from_config(&config.lifecycle) {
        Ok(Some(client)) => client,
        Ok(None) => {
            log!("lifecycle"; "disabled, --restart ignored");
            return;
        }
        Err(e) => {
            log!("warning"; "{}", e);
            return;
        }
    };

    match client.restart_all().await {
        Ok(outcome) => {
            let failed: Vec<_> = outcome.failed().collect();
            if outcome.success && failed.is_empty() {
                log!("lifecycle"; "restarted {} units", outcome.results.len());
            } else {
                log!("warning"; "restart: {} (failed: {})", outcome.message, failed.join(", "));
            }
        }
        Err(e) => log!("warning"; "restart: {}", e),
    }
}

//! Optional external command run after each reload broadcast.

use anyhow::Result;

use crate::utils::exec::{Cmd, CommandOutcome};
use crate::{debug, log};

/// Run `command` and wait for it.
pub async fn run(command: &[String]) -> Result<CommandOutcome> {
    Cmd::from_slice(command).run_async().await
}

/// Run `command` if configured, logging the outcome. Never fails.
pub async fn run_logged(command: &[String]) -> Option<CommandOutcome> {
    if command.is_empty() {
        return None;
    }
    match run(command).await {
        Ok(outcome) if outcome.success() => {
            debug!("reload"; "restart command finished");
            Some(outcome)
        }
        Ok(outcome) => {
            log!("warning"; "restart command {}", outcome.describe());
            Some(outcome)
        }
        Err(e) => {
            log!("warning"; "restart command: {:#}", e);
            None
        }
    }
}

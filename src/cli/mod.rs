//! Command-line interface module.

mod args;
pub mod build;
pub mod check;
pub mod watch;

pub use args::{Cli, Commands};

use anyhow::{Context, Result};

/// Multi-threaded runtime for commands that drive async work.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

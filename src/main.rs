//! hotmod - incremental module builder with host sync and live reload.

#![allow(dead_code)]

mod actor;
mod build;
mod cli;
mod config;
mod core;
mod lifecycle;
mod logger;
mod manifest;
mod module;
mod reload;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Arc::new(ProjectConfig::load(&cli)?);

    match &cli.command {
        Commands::Check => cli::check::run(&config),
        Commands::Build { restart, .. } => cli::build::run(config, *restart),
        Commands::Watch { .. } => cli::watch::run(config),
    }
}

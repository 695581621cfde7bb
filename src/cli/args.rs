//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Incremental module builder with host sync and live reload
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, global = true, default_value = "hotmod.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check every module's layout and manifest
    #[command(visible_alias = "c")]
    Check,

    /// Check, then build foundation, modules and the shared front-end
    #[command(visible_alias = "b")]
    Build {
        /// Do not contact the host lifecycle API
        #[arg(long)]
        no_lifecycle: bool,

        /// Restart every host unit after the build pass
        #[arg(short, long)]
        restart: bool,
    },

    /// Build once, then rebuild changed modules and live-reload clients
    #[command(visible_alias = "w")]
    Watch {
        /// Live-reload WebSocket port
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not contact the host lifecycle API
        #[arg(long)]
        no_lifecycle: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_with_port() {
        let cli = Cli::parse_from(["hotmod", "watch", "--port", "4000"]);
        assert!(matches!(cli.command, Commands::Watch { port: Some(4000), .. }));
        assert_eq!(cli.config, PathBuf::from("hotmod.toml"));
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from(["hotmod", "-v", "b", "--restart", "--no-lifecycle"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Build {
                restart: true,
                no_lifecycle: true
            }
        ));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

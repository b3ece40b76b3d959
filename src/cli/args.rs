//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Zenith - a menu launcher for security tools.
#[derive(Debug, Parser)]
#[command(name = "zenith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default ~/.zenith/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Answer yes to install confirmations
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive menu (default if no command specified)
    Menu,

    /// List tools by category
    List(ListArgs),

    /// Clone a tool and install its dependencies
    Install(InstallArgs),

    /// Run a tool, installing it first if needed
    Run(RunArgs),

    /// Forget recorded dependency installs
    ResetDeps(ResetDepsArgs),

    /// Show config file contents and platform details
    Info,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only list one category (e.g. information_gathering)
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Tool to install
    pub tool: String,

    /// Delete an existing checkout and clone again
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Tool to run
    pub tool: String,

    /// Arguments passed to the tool instead of prompting
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `reset-deps` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResetDepsArgs {
    /// Only reset this tool (all tools when omitted)
    pub tool: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["zenith"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["zenith", "list", "--yes", "--debug"]).unwrap();
        assert!(cli.yes);
        assert!(cli.debug);
    }

    #[test]
    fn install_with_overwrite() {
        let cli = Cli::try_parse_from(["zenith", "install", "cupp", "--overwrite"]).unwrap();
        match cli.command {
            Some(Commands::Install(args)) => {
                assert_eq!(args.tool, "cupp");
                assert!(args.overwrite);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn run_passes_trailing_arguments() {
        let cli =
            Cli::try_parse_from(["zenith", "run", "bettercap", "-iface", "eth0"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.tool, "bettercap");
                assert_eq!(args.args, vec!["-iface", "eth0"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn reset_deps_tool_is_optional() {
        let cli = Cli::try_parse_from(["zenith", "reset-deps"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::ResetDeps(ResetDepsArgs { tool: None }))
        ));
    }
}

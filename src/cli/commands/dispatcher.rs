//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::ZenithConfig;
use crate::error::Result;
use crate::install::InstallOptions;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success for `0`, failure with the code otherwise.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: PathBuf,
    config: ZenithConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher around the loaded config.
    pub fn new(config_path: PathBuf, config: ZenithConfig) -> Self {
        Self {
            config_path,
            config,
        }
    }

    /// Path the config was loaded from and is saved to.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &ZenithConfig {
        &self.config
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let options = InstallOptions {
            unattended: cli.yes || self.config.unattended,
            overwrite: false,
        };
        let install_dir = self.config.install_dir();

        match &cli.command {
            Some(Commands::Menu) | None => {
                let cmd =
                    super::menu::MenuCommand::new(&self.config_path, self.config.clone(), options);
                cmd.execute(ui)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(&install_dir, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Install(args)) => {
                let cmd = super::install::InstallCommand::new(&self.config, args.clone(), options);
                cmd.execute(ui)
            }
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(&self.config, args.clone(), options);
                cmd.execute(ui)
            }
            Some(Commands::ResetDeps(args)) => {
                let cmd = super::reset::ResetDepsCommand::new(&install_dir, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Info) => {
                let cmd = super::info::InfoCommand::new(&self.config_path, &self.config);
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}

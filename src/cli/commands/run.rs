//! Run command implementation.
//!
//! The `zenith run <tool> [args..]` command runs one tool directly. Extra
//! arguments go to the tool in place of its interactive prompts.

use crate::catalogue::Catalogue;
use crate::cli::args::RunArgs;
use crate::config::ZenithConfig;
use crate::error::{Result, ZenithError};
use crate::fetch::GitFetcher;
use crate::install::{default_context, InstallOptions, InstallerContext};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::launch::{ensure_installed, run_tool};

/// The run command implementation.
pub struct RunCommand {
    config: ZenithConfig,
    args: RunArgs,
    options: InstallOptions,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(config: &ZenithConfig, args: RunArgs, options: InstallOptions) -> Self {
        Self {
            config: config.clone(),
            args,
            options,
        }
    }

    /// Execute against an explicit installer context.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        catalogue: &Catalogue,
        ctx: &InstallerContext<'_>,
    ) -> Result<CommandResult> {
        let tool = catalogue
            .find(&self.args.tool)
            .ok_or_else(|| ZenithError::UnknownTool {
                name: self.args.tool.clone(),
            })?;

        if !ensure_installed(tool, ui, self.options, ctx)? {
            return Ok(CommandResult::failure(1));
        }

        let code = run_tool(tool, ui, &self.args.args)?;
        Ok(CommandResult::from_exit_code(code))
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalogue = Catalogue::new(&self.config.install_dir());
        let fetcher = GitFetcher::new(self.config.clone_over_ssh());
        self.execute_with(ui, &catalogue, &default_context(&fetcher))
    }
}

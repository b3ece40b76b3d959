//! Install command implementation.
//!
//! The `zenith install <tool>` command clones a tool and installs its
//! dependencies without entering the menu. An existing checkout is
//! updated with `git pull`, or re-cloned with `--overwrite`. The user is
//! asked first unless `--yes` or `unattended` is set.

use crate::catalogue::Catalogue;
use crate::cli::args::InstallArgs;
use crate::config::ZenithConfig;
use crate::error::{Result, ZenithError};
use crate::fetch::GitFetcher;
use crate::install::{default_context, install, InstallOptions, InstallerContext};
use crate::ui::{confirm, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    config: ZenithConfig,
    args: InstallArgs,
    options: InstallOptions,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(config: &ZenithConfig, args: InstallArgs, options: InstallOptions) -> Self {
        let options = InstallOptions {
            overwrite: args.overwrite,
            ..options
        };
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

        let Some(repository) = tool.repository() else {
            ui.message(&format!("{} is built in; nothing to install", tool.name()));
            return Ok(CommandResult::success());
        };

        let accepted = self.options.unattended
            || confirm(
                ui,
                "confirm_install",
                &format!("Do you want to install {}?", repository.url()),
            )?;
        if !accepted {
            ui.message("Installation cancelled");
            return Ok(CommandResult::failure(1));
        }

        let outcome = install(repository, ui, self.options, ctx)?;
        Ok(CommandResult::from_exit_code(outcome.exit_code()))
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalogue = Catalogue::new(&self.config.install_dir());
        let fetcher = GitFetcher::new(self.config.clone_over_ssh());
        self.execute_with(ui, &catalogue, &default_context(&fetcher))
    }
}

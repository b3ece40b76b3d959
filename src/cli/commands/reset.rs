//! Reset-deps command implementation.
//!
//! `zenith reset-deps` runs the `reset_dependencies` utility for every
//! tool. `zenith reset-deps <tool>` forgets one tool's marker without
//! asking.

use std::path::{Path, PathBuf};

use crate::catalogue::utilities::ResetDependencies;
use crate::catalogue::{Catalogue, Tool};
use crate::cli::args::ResetDepsArgs;
use crate::error::{Result, ZenithError};
use crate::install::{reset_dependencies, DependencyTracker};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The reset-deps command implementation.
pub struct ResetDepsCommand {
    install_dir: PathBuf,
    args: ResetDepsArgs,
}

impl ResetDepsCommand {
    /// Create a new reset-deps command.
    pub fn new(install_dir: &Path, args: ResetDepsArgs) -> Self {
        Self {
            install_dir: install_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for ResetDepsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(name) = &self.args.tool else {
            let code = ResetDependencies::new(&self.install_dir).run(ui, &[])?;
            return Ok(CommandResult::from_exit_code(code));
        };

        let catalogue = Catalogue::new(&self.install_dir);
        let tool = catalogue
            .find(name)
            .ok_or_else(|| ZenithError::UnknownTool { name: name.clone() })?;
        let Some(repository) = tool.repository() else {
            ui.message(&format!("{} has no dependencies to reset", tool.name()));
            return Ok(CommandResult::success());
        };

        if !DependencyTracker::marker_path(&repository.local_directory).exists() {
            ui.message(&format!("No dependency marker for {}", tool.name()));
            return Ok(CommandResult::success());
        }

        reset_dependencies(repository);
        ui.success(&format!("Reset dependencies for {}", tool.name()));
        Ok(CommandResult::success())
    }
}

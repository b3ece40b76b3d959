//! List command implementation.
//!
//! The `zenith list` command prints the catalogue, one table per category.

use std::path::{Path, PathBuf};

use crate::catalogue::{Catalogue, Category};
use crate::cli::args::ListArgs;
use crate::error::{Result, ZenithError};
use crate::platform::PathLocator;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    install_dir: PathBuf,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(install_dir: &Path, args: ListArgs) -> Self {
        Self {
            install_dir: install_dir.to_path_buf(),
            args,
        }
    }

    fn categories(&self) -> Result<Vec<Category>> {
        match &self.args.category {
            None => Ok(Category::ALL.to_vec()),
            Some(key) => Category::from_key(key)
                .map(|c| vec![c])
                .ok_or_else(|| ZenithError::ConfigValidationError {
                    message: format!(
                        "Unknown category '{}'. Expected one of: {}",
                        key,
                        Category::ALL
                            .iter()
                            .map(|c| c.key())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                }),
        }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let catalogue = Catalogue::new(&self.install_dir);
        let locator = PathLocator;

        for category in self.categories()? {
            let mut table =
                Table::new(vec!["Name", "Installed", "Description"]).with_title(category.title());
            for tool in catalogue.in_category(category) {
                let installed = if tool.installed(&locator) { "yes" } else { "no" };
                table.add_row(vec![tool.name(), installed, tool.description()]);
            }
            ui.show_table(&table);
        }

        Ok(CommandResult::success())
    }
}

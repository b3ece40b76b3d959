//! Interactive menu.
//!
//! The `zenith menu` command (also the default) gates on the terms
//! agreement, then loops over category selection, tool selection and
//! install-and-run until the user exits.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalogue::{Catalogue, Category, Tool};
use crate::config::{save_config, ZenithConfig};
use crate::error::Result;
use crate::fetch::GitFetcher;
use crate::install::{default_context, InstallOptions, InstallerContext};
use crate::shell::EXIT_INTERRUPTED;
use crate::ui::{confirm, pause, Prompt, PromptOption, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::launch::{ensure_installed, run_tool};

/// Terms shown before first use.
pub const TERMS: &str = "\
I shall not use Zenith to:
(i) upload or otherwise transmit, display or distribute any
content that infringes any trademark, trade secret, copyright
or other proprietary or intellectual property rights of any
person; (ii) upload or otherwise transmit any material that contains
software viruses or any other computer code, files or programs
designed to interrupt, destroy or limit the functionality of any
computer software or hardware or telecommunications equipment;";

/// Menu value that leaves the current category.
pub const BACK: &str = "back";
/// Menu value that quits.
pub const EXIT: &str = "exit";

/// Tools listed per category on the main screen before eliding.
const PREVIEW_CUTOFF: usize = 5;

/// The menu command implementation.
pub struct MenuCommand {
    config_path: PathBuf,
    config: ZenithConfig,
    options: InstallOptions,
}

impl MenuCommand {
    pub fn new(config_path: &Path, config: ZenithConfig, options: InstallOptions) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            config,
            options,
        }
    }
}

impl Command for MenuCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !ui.is_interactive() {
            ui.error(
                "The menu needs an interactive terminal. Use `zenith list`, `zenith install` or `zenith run`.",
            );
            return Ok(CommandResult::failure(2));
        }

        let mut config = self.config.clone();
        let catalogue = Catalogue::new(&config.install_dir());
        let fetcher = GitFetcher::new(config.clone_over_ssh());
        let ctx = default_context(&fetcher);

        let mut menu = Menu {
            catalogue: &catalogue,
            config: &mut config,
            config_path: &self.config_path,
            options: self.options,
            ctx: &ctx,
        };
        menu.run(ui)
    }
}

/// What the menu loop does after a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Exit,
}

/// One menu session.
pub struct Menu<'a> {
    pub catalogue: &'a Catalogue,
    pub config: &'a mut ZenithConfig,
    pub config_path: &'a Path,
    pub options: InstallOptions,
    pub ctx: &'a InstallerContext<'a>,
}

impl Menu<'_> {
    /// Run until `exit` or Ctrl-C. The config is saved either way.
    pub fn run(&mut self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.session(ui) {
            Ok(()) => {
                self.save(ui);
                Ok(CommandResult::success())
            }
            Err(e) if e.is_interrupted() => {
                debug!("Menu interrupted");
                ui.message("Exiting...");
                self.save(ui);
                Ok(CommandResult::failure(EXIT_INTERRUPTED))
            }
            Err(e) => Err(e),
        }
    }

    fn session(&mut self, ui: &mut dyn UserInterface) -> Result<()> {
        self.agreement(ui)?;
        while self.main_screen(ui)? == Step::Continue {}
        Ok(())
    }

    fn save(&self, ui: &mut dyn UserInterface) {
        if let Err(e) = save_config(self.config, self.config_path) {
            warn!("Could not save config: {}", e);
            ui.warning(&format!("Could not save config: {}", e));
        }
    }

    /// Ask until the terms are accepted. Acceptance is saved immediately.
    fn agreement(&mut self, ui: &mut dyn UserInterface) -> Result<()> {
        while !self.config.agreement {
            ui.clear_screen();
            ui.show_header("Terms of Use");
            ui.message(TERMS);
            if confirm(
                ui,
                "agreement",
                "You must agree to our terms and conditions first",
            )? {
                self.config.agreement = true;
                self.save(ui);
            }
        }
        Ok(())
    }

    fn main_screen(&mut self, ui: &mut dyn UserInterface) -> Result<Step> {
        ui.clear_screen();
        ui.show_header("Zenith");
        ui.show_table(&category_table(self.catalogue));

        let mut options: Vec<PromptOption> = Category::ALL
            .iter()
            .map(|c| PromptOption::new(c.title(), c.key()))
            .collect();
        options.push(PromptOption::new("Exit", EXIT));

        let selected = ui
            .prompt(&Prompt::select("category", "Select a category", options))?
            .as_string();

        if selected == EXIT {
            return Ok(Step::Exit);
        }
        match Category::from_key(&selected) {
            Some(category) => self.category_screen(ui, category),
            None => {
                ui.warning("Invalid Command");
                Ok(Step::Continue)
            }
        }
    }

    fn category_screen(&mut self, ui: &mut dyn UserInterface, category: Category) -> Result<Step> {
        loop {
            let tools = self.catalogue.in_category(category);
            ui.clear_screen();
            ui.show_table(&tool_table(category, &tools));

            let mut options: Vec<PromptOption> = tools
                .iter()
                .map(|t| PromptOption::new(t.name(), t.name()))
                .collect();
            options.push(PromptOption::new("Back", BACK));
            options.push(PromptOption::new("Exit", EXIT));

            let selected = ui
                .prompt(&Prompt::select("tool", "Select a tool", options))?
                .as_string();

            match selected.as_str() {
                BACK | "return" => return Ok(Step::Continue),
                EXIT => return Ok(Step::Exit),
                name => match tools.iter().find(|t| t.name() == name) {
                    Some(tool) => {
                        self.launch(ui, *tool)?;
                        pause(ui)?;
                        return Ok(Step::Continue);
                    }
                    None => {
                        ui.error("Invalid Command");
                        ui.warning("Please select a valid tool from the list above");
                        pause(ui)?;
                    }
                },
            }
        }
    }

    /// Install if needed, then run. Tool failures are reported, never
    /// propagated; only interrupts end the session.
    fn launch(&self, ui: &mut dyn UserInterface, tool: &dyn Tool) -> Result<()> {
        let result = ensure_installed(tool, ui, self.options, self.ctx).and_then(|ready| {
            if ready {
                run_tool(tool, ui, &[]).map(|_| ())
            } else {
                Ok(())
            }
        });
        match result {
            Err(e) if !e.is_interrupted() => {
                ui.error(&e.to_string());
                Ok(())
            }
            other => other,
        }
    }
}

/// Main screen: each category with its first few tools.
fn category_table(catalogue: &Catalogue) -> Table {
    let mut table = Table::new(vec!["Category", "Tools"]);
    for category in Category::ALL {
        let names: Vec<&str> = catalogue
            .in_category(category)
            .iter()
            .map(|t| t.name())
            .collect();
        let mut preview = names
            .iter()
            .take(PREVIEW_CUTOFF)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if names.len() > PREVIEW_CUTOFF {
            preview.push_str(", ...");
        }
        table.add_row(vec![category.key(), preview.as_str()]);
    }
    table
}

/// Category screen: name, description and repository of each tool.
fn tool_table(category: Category, tools: &[&dyn Tool]) -> Table {
    let with_links = category != Category::Utilities;
    let headers = if with_links {
        vec!["Name", "Description", "Repository"]
    } else {
        vec!["Name", "Description"]
    };
    let mut table = Table::new(headers).with_title(category.title());
    for tool in tools {
        let link = tool.repository().map(|r| r.url()).unwrap_or_default();
        let mut row = vec![tool.name(), tool.description()];
        if with_links {
            row.push(link.as_str());
        }
        table.add_row(row);
    }
    table
}

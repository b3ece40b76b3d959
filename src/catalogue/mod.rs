//! The built-in tool catalogue.
//!
//! Every menu entry implements [`Tool`]. Repository-backed tools carry a
//! [`ToolDescriptor`] and share the installer; utilities run in-process.

pub mod descriptor;
pub mod tools;
pub mod utilities;

pub use descriptor::ToolDescriptor;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform::CommandLocator;
use crate::ui::UserInterface;

/// GitHub path of this project, used by the contributors utility.
pub const PROJECT_REPOSITORY: &str = "xShadyy/zenith";

/// Menu category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    InformationGathering,
    Networking,
    Passwords,
    Obfuscation,
    Utilities,
}

impl Category {
    /// Menu order.
    pub const ALL: [Category; 5] = [
        Category::InformationGathering,
        Category::Networking,
        Category::Passwords,
        Category::Obfuscation,
        Category::Utilities,
    ];

    /// Command name typed or selected in the menu.
    pub fn key(self) -> &'static str {
        match self {
            Category::InformationGathering => "information_gathering",
            Category::Networking => "networking",
            Category::Passwords => "passwords",
            Category::Obfuscation => "obfuscation",
            Category::Utilities => "utilities",
        }
    }

    /// Display title.
    pub fn title(self) -> &'static str {
        match self {
            Category::InformationGathering => "Information Gathering",
            Category::Networking => "Networking",
            Category::Passwords => "Passwords",
            Category::Obfuscation => "Obfuscation",
            Category::Utilities => "Utilities",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A menu entry.
pub trait Tool {
    /// Menu name.
    fn name(&self) -> &str;

    /// One-line description.
    fn description(&self) -> &str;

    fn category(&self) -> Category;

    /// Source repository, for tools that are fetched and installed.
    fn repository(&self) -> Option<&ToolDescriptor> {
        None
    }

    /// Whether the tool can run now.
    ///
    /// Repository tools count as installed once their checkout exists.
    fn installed(&self, _locator: &dyn CommandLocator) -> bool {
        self.repository()
            .map(|repo| repo.local_directory.exists())
            .unwrap_or(true)
    }

    /// Run the tool. With no `args` the tool prompts for its input.
    ///
    /// Returns the tool's exit code.
    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32>;
}

/// All tools, in menu order.
pub struct Catalogue {
    install_dir: PathBuf,
    tools: Vec<Box<dyn Tool>>,
}

impl Catalogue {
    /// Build the catalogue with checkouts under `install_dir`.
    pub fn new(install_dir: &Path) -> Self {
        let mut tools = tools::repository_tools(install_dir);
        tools.extend(utilities::utilities(install_dir));
        Self {
            install_dir: install_dir.to_path_buf(),
            tools,
        }
    }

    /// Build a catalogue from explicit entries.
    pub fn from_tools(install_dir: &Path, tools: Vec<Box<dyn Tool>>) -> Self {
        Self {
            install_dir: install_dir.to_path_buf(),
            tools,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Look a tool up by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .map(|t| t.as_ref())
    }

    /// Tools in one category, in catalogue order.
    pub fn in_category(&self, category: Category) -> Vec<&dyn Tool> {
        self.tools
            .iter()
            .filter(|t| t.category() == category)
            .map(|t| t.as_ref())
            .collect()
    }

    /// Every tool.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }
}

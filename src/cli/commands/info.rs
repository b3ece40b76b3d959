//! Info command implementation.
//!
//! The `zenith info` command prints the config file and what Zenith
//! detects about the host.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ZenithConfig;
use crate::error::Result;
use crate::platform::{CommandLocator, PathLocator, Platform};
use crate::shell::is_elevated;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The info command implementation.
pub struct InfoCommand {
    config_path: PathBuf,
    config: ZenithConfig,
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(config_path: &Path, config: &ZenithConfig) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            config: config.clone(),
        }
    }

    /// `(heading, value)` pairs in display order.
    pub fn sections(&self, locator: &dyn CommandLocator) -> Vec<(String, String)> {
        let config_file = match fs::read_to_string(&self.config_path) {
            Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
            Ok(_) => "(empty)".to_string(),
            Err(_) => "(not found, using defaults)".to_string(),
        };
        let platform = Platform::detect(locator);

        vec![
            (
                format!("Config File ({})", self.config_path.display()),
                config_file,
            ),
            (
                "Install Directory".to_string(),
                self.config.install_dir().display().to_string(),
            ),
            ("Zenith Version".to_string(), env!("CARGO_PKG_VERSION").to_string()),
            (
                "Platform".to_string(),
                format!(
                    "{} ({} {})",
                    platform.os,
                    std::env::consts::OS,
                    std::env::consts::ARCH
                ),
            ),
            (
                "Package Manager".to_string(),
                platform
                    .package_manager
                    .map(|pm| pm.name().to_string())
                    .unwrap_or_else(|| "none".to_string()),
            ),
            (
                "Running as root".to_string(),
                if is_elevated() { "yes" } else { "no" }.to_string(),
            ),
        ]
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        for (heading, value) in self.sections(&PathLocator) {
            ui.message(&format!("# {}", heading));
            ui.message(&value);
            ui.message("");
        }
        Ok(CommandResult::success())
    }
}

//! Executable lookup.
//!
//! Every "is this tool installed?" question goes through [`CommandLocator`]
//! so resolution logic can be exercised against a fake PATH.

use std::collections::HashSet;

/// Answers whether an executable is available.
pub trait CommandLocator {
    /// Whether `name` resolves to an executable.
    fn has_command(&self, name: &str) -> bool;
}

/// Looks executables up on the process `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl CommandLocator for PathLocator {
    fn has_command(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }
}

/// A fixed set of "installed" commands.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    commands: HashSet<String>,
}

impl StaticLocator {
    /// Create a locator that reports exactly `commands` as present.
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// A locator with nothing installed.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl CommandLocator for StaticLocator {
    fn has_command(&self, name: &str) -> bool {
        self.commands.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_locator_reports_listed_commands() {
        let locator = StaticLocator::new(["curl", "go"]);
        assert!(locator.has_command("curl"));
        assert!(locator.has_command("go"));
        assert!(!locator.has_command("wget"));
    }

    #[test]
    fn empty_locator_has_nothing() {
        assert!(!StaticLocator::empty().has_command("sh"));
    }

    #[test]
    fn path_locator_misses_nonsense() {
        assert!(!PathLocator.has_command("zenith-definitely-not-a-real-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn path_locator_finds_sh() {
        assert!(PathLocator.has_command("sh"));
    }
}

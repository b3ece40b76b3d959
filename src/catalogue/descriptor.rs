//! Static description of a catalogued tool.

use std::path::PathBuf;

use crate::install::InstallSpec;

use super::Category;

/// Where a tool comes from and how to install it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Menu name, also the checkout directory name.
    pub name: String,
    /// GitHub `owner/repo`.
    pub remote_path: String,
    /// Checkout directory.
    pub local_directory: PathBuf,
    /// Dependency install spec, if the tool needs one.
    pub install: Option<InstallSpec>,
    /// One-line description for the menu.
    pub description: String,
    pub category: Category,
    /// Whether installing starts with a git clone.
    pub clone: bool,
}

impl ToolDescriptor {
    /// A cloned tool living at `<install_dir>/<name>`.
    pub fn new(
        name: &str,
        remote_path: &str,
        install_dir: &std::path::Path,
        category: Category,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            remote_path: remote_path.to_string(),
            local_directory: install_dir.join(name),
            install: None,
            description: description.to_string(),
            category,
            clone: true,
        }
    }

    pub fn with_install(mut self, spec: InstallSpec) -> Self {
        self.install = Some(spec);
        self
    }

    /// Install through the resolver only, without cloning first.
    pub fn without_clone(mut self) -> Self {
        self.clone = false;
        self
    }

    /// Repository page.
    pub fn url(&self) -> String {
        format!("https://github.com/{}", self.remote_path)
    }
}

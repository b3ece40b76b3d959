//! Persistent user configuration.
//!
//! Zenith keeps a small YAML file at `~/.zenith/config.yml`:
//!
//! ```yaml
//! ssh_clone: false
//! agreement: true
//! install_dir: /opt/zenith/tools
//! unattended: false
//! ```
//!
//! Every field is optional. A missing file means defaults.

pub mod loader;

pub use loader::{
    apply_env_overrides, default_config_path, load_config, parse_config, save_config,
    ENV_INSTALL_DIR, ENV_SSH_CLONE,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory holding Zenith's config and tool checkouts.
pub const ZENITH_DIR: &str = ".zenith";

/// User configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZenithConfig {
    /// Clone over SSH (`git@github.com:`) instead of HTTPS.
    pub ssh_clone: bool,

    /// Whether the user accepted the terms of use.
    pub agreement: bool,

    /// Where tool checkouts live. Defaults to `~/.zenith/tools`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Answer "yes" to install confirmations.
    pub unattended: bool,

    /// Values from the environment for this run only. Never saved.
    #[serde(skip)]
    pub overrides: EnvOverrides,
}

/// Per-run settings taken from `ZENITH_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub install_dir: Option<PathBuf>,
    pub ssh_clone: Option<bool>,
}

impl ZenithConfig {
    /// Resolved tool install directory.
    pub fn install_dir(&self) -> PathBuf {
        self.overrides
            .install_dir
            .clone()
            .or_else(|| self.install_dir.clone())
            .unwrap_or_else(default_install_dir)
    }

    /// Whether checkouts use SSH URLs for this run.
    pub fn clone_over_ssh(&self) -> bool {
        self.overrides.ssh_clone.unwrap_or(self.ssh_clone)
    }
}

/// `~/.zenith`, or `./.zenith` when there is no home directory.
pub fn zenith_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(ZENITH_DIR)
}

/// `~/.zenith/tools`.
pub fn default_install_dir() -> PathBuf {
    zenith_home().join("tools")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_off() {
        let config = ZenithConfig::default();
        assert!(!config.ssh_clone);
        assert!(!config.agreement);
        assert!(!config.unattended);
        assert!(config.install_dir.is_none());
    }

    #[test]
    fn install_dir_defaults_under_zenith_home() {
        let config = ZenithConfig::default();
        assert!(config.install_dir().ends_with(".zenith/tools"));
    }

    #[test]
    fn install_dir_override() {
        let config = ZenithConfig {
            install_dir: Some(PathBuf::from("/opt/tools")),
            ..Default::default()
        };
        assert_eq!(config.install_dir(), PathBuf::from("/opt/tools"));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = ZenithConfig {
            ssh_clone: true,
            install_dir: Some(PathBuf::from("/opt/tools")),
            overrides: EnvOverrides {
                install_dir: Some(PathBuf::from("/tmp/tools")),
                ssh_clone: Some(false),
            },
            ..Default::default()
        };
        assert_eq!(config.install_dir(), PathBuf::from("/tmp/tools"));
        assert!(!config.clone_over_ssh());
    }
}

//! Configuration file loading and saving.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ZenithError};

use super::{zenith_home, ZenithConfig};

/// Overrides `install_dir`.
pub const ENV_INSTALL_DIR: &str = "ZENITH_INSTALL_DIR";

/// Overrides `ssh_clone` (`1`/`true`/`yes` enable it).
pub const ENV_SSH_CLONE: &str = "ZENITH_SSH_CLONE";

/// `~/.zenith/config.yml`.
pub fn default_config_path() -> PathBuf {
    zenith_home().join("config.yml")
}

/// Load the config at `path`. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<ZenithConfig> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(ZenithConfig::default());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse YAML config content. `path` is used for error messages only.
pub fn parse_config(content: &str, path: &Path) -> Result<ZenithConfig> {
    if content.trim().is_empty() {
        return Ok(ZenithConfig::default());
    }

    let config: ZenithConfig =
        serde_yaml::from_str(content).map_err(|e| ZenithError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(dir) = &config.install_dir {
        if dir.as_os_str().is_empty() {
            return Err(ZenithError::ConfigValidationError {
                message: "install_dir must not be empty".to_string(),
            });
        }
    }

    Ok(config)
}

/// Apply environment overrides using the given lookup.
///
/// Overrides only last for this run; [`save_config`] writes the file values.
pub fn apply_env_overrides(config: &mut ZenithConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = lookup(ENV_INSTALL_DIR).filter(|v| !v.trim().is_empty()) {
        debug!("{} overrides install_dir", ENV_INSTALL_DIR);
        config.overrides.install_dir = Some(PathBuf::from(dir));
    }

    if let Some(value) = lookup(ENV_SSH_CLONE) {
        config.overrides.ssh_clone = Some(matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ));
    }
}

/// Save the config using atomic write.
///
/// Uses the write-to-temp-then-rename pattern to prevent corruption.
pub fn save_config(config: &ZenithConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let content =
        serde_yaml::to_string(config).map_err(|e| ZenithError::ConfigValidationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

    let temp_path = path.with_extension("yml.tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, path)?;

    debug!("Saved config to {}", path.display());
    Ok(())
}

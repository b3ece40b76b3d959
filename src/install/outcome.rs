//! Install outcomes reported back to the menu.

use std::fmt;
use std::path::PathBuf;

use crate::error::InstallError;
use crate::platform::{OsTag, PackageManager};

/// The result of one `install()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dependencies are in place.
    Success,
    /// The user declined a confirmation.
    UserCancelled,
    /// Nothing in the install spec applies to this platform.
    PlatformUnsupported {
        available_options: Vec<String>,
        os: OsTag,
        package_manager: Option<PackageManager>,
    },
    /// The install command ran and exited non-zero.
    CommandFailed { exit_code: i32 },
    /// The source checkout could not be fetched.
    CloneFailed { path: PathBuf },
    /// Resolution failed for another reason (missing manifest, no downloader).
    Unresolved { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Process exit code for the `install` subcommand.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::CommandFailed { exit_code } => *exit_code,
            _ => 1,
        }
    }
}

impl From<InstallError> for Outcome {
    fn from(err: InstallError) -> Self {
        match err {
            InstallError::PlatformUnsupported {
                available_options,
                os,
                package_manager,
            } => Outcome::PlatformUnsupported {
                available_options,
                os,
                package_manager,
            },
            other => Outcome::Unresolved {
                reason: other.to_string(),
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Installation successful"),
            Outcome::UserCancelled => write!(f, "Installation cancelled"),
            Outcome::PlatformUnsupported {
                available_options,
                os,
                package_manager,
            } => write!(
                f,
                "Platform not supported. Available options: {}. Detected OS: {}, Package manager: {}",
                available_options.join(", "),
                os,
                package_manager.map(|pm| pm.name()).unwrap_or("none")
            ),
            Outcome::CommandFailed { exit_code } => {
                write!(f, "Installation failed with exit code {}", exit_code)
            }
            Outcome::CloneFailed { path } => {
                write!(f, "Failed to clone into {}", path.display())
            }
            Outcome::Unresolved { reason } => write!(f, "{}", reason),
        }
    }
}

//! Error types for Zenith operations.
//!
//! This module defines [`ZenithError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ZenithError` for failures that need distinct handling
//! - Install and clone failures have their own enums ([`InstallError`],
//!   [`CloneError`]) so the menu can report them without unwinding
//! - Use `anyhow::Error` (via `ZenithError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::platform::{OsTag, PackageManager};

/// Core error type for Zenith operations.
#[derive(Debug, Error)]
pub enum ZenithError {
    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Selected tool is not part of the catalogue.
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// Shell command could not be started or was killed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A dependency declaration could not be understood.
    #[error("Malformed dependency declaration: {line}")]
    MalformedDependency { line: String },

    /// Repository fetch failed.
    #[error(transparent)]
    Clone(#[from] CloneError),

    /// Install resolution failed.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ZenithError {
    /// Whether this error came from the user pressing Ctrl-C at a prompt.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ZenithError::Io(e) if e.kind() == std::io::ErrorKind::Interrupted)
    }
}

/// Failure to turn an install specification into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    /// The pip manifest named by the spec does not exist and there is no
    /// `pyproject.toml` to fall back to.
    #[error("Requirements file not found: {}", path.display())]
    RequirementsNotFound { path: PathBuf },

    /// A binary download was requested but neither curl nor wget exists.
    #[error("Supported download tools missing (need curl or wget)")]
    DownloaderMissing,

    /// No branch of the resolver matched this platform.
    #[error(
        "Platform not supported. Available options: {}. Detected OS: {os}, Package manager: {}",
        available_options.join(", "),
        package_manager.map(|pm| pm.name()).unwrap_or("none")
    )]
    PlatformUnsupported {
        available_options: Vec<String>,
        os: OsTag,
        package_manager: Option<PackageManager>,
    },
}

/// Failure to clone or update a tool checkout.
#[derive(Debug, Error)]
pub enum CloneError {
    /// git exited unsuccessfully.
    #[error("git {operation} failed: {message}")]
    Git { operation: String, message: String },

    /// The checkout directory does not exist after cloning.
    #[error("{} not found after clone", path.display())]
    Missing { path: PathBuf },

    /// Filesystem error while preparing the checkout.
    #[error("IO error during clone: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Zenith operations.
pub type Result<T> = std::result::Result<T, ZenithError>;

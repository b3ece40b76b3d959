//! Zenith - an interactive launcher for third-party security tools.
//!
//! Zenith clones tool repositories, installs their dependencies with
//! whatever the host offers (pip, go, a binary download, the system package
//! manager) and runs them from a menu.
//!
//! # Modules
//!
//! - [`catalogue`] - The built-in tools and utilities
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - The persisted user configuration
//! - [`error`] - Error types and result aliases
//! - [`fetch`] - Git checkout of tool sources
//! - [`install`] - Install resolution, execution and dependency markers
//! - [`platform`] - OS and package manager detection
//! - [`shell`] - Shell command execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use zenith::install::{resolve, InstallSpec, ResolveContext};
//! use zenith::platform::{OsTag, PackageManager, Platform, StaticLocator};
//!
//! let spec = InstallSpec::options([("apt-get", "libpcap-dev")]);
//! let platform = Platform::new(OsTag::Linux, Some(PackageManager::AptGet));
//! let locator = StaticLocator::empty();
//! let ctx = ResolveContext {
//!     tool_name: "demo",
//!     tool_dir: Path::new("/tmp/demo"),
//!     locator: &locator,
//! };
//!
//! let plan = resolve(&spec, &platform, &ctx).unwrap();
//! assert_eq!(plan.command, "sudo apt-get install -y libpcap-dev");
//! ```

pub mod catalogue;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod platform;
pub mod shell;
pub mod ui;

pub use error::{Result, ZenithError};

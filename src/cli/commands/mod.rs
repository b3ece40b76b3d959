//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. The menu, `run` and `install`
//! share the install-if-missing flow in [`launch`].

pub mod completions;
pub mod dispatcher;
pub mod info;
pub mod install;
pub mod launch;
pub mod list;
pub mod menu;
pub mod reset;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

//! Shell command execution and environment checks.

pub mod command;
pub mod exit;
pub mod platform;

pub use command::{
    execute, execute_streaming, execute_with_timeout, run_program, run_shell, shell_quote,
    CommandOptions, CommandResult, OutputCallback, OutputLine,
};
pub use exit::{exit_code_of, ExitKind, EXIT_INTERRUPTED, EXIT_NOT_FOUND, EXIT_TIMEOUT};
pub use platform::{is_ci, is_elevated};

//! Shell command execution.

use crate::error::{Result, ZenithError};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::exit::exit_code_of;

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: status.code(),
            stdout,
            stderr,
            duration,
            success: status.success(),
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new(shell_program());
    cmd.arg(shell_flag());
    cmd.arg(command);
    cmd
}

/// Execute a shell command.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = shell_command(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|_| ZenithError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    Ok(CommandResult::from_status(
        output.status,
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        start.elapsed(),
    ))
}

/// Quote `value` for `sh` when it holds anything beyond plain path
/// characters.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+=:@,%".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Run a shell command attached to the terminal and return its exit code.
///
/// Nothing is captured: the command reads and writes the user's terminal
/// directly. A signal death is reported as `128 + signal` (so Ctrl-C in the
/// child surfaces as 130).
pub fn run_shell(command: &str, cwd: Option<&Path>) -> Result<i32> {
    tracing::debug!("Running shell command: {}", command);

    let mut cmd = shell_command(command);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let status = cmd.status().map_err(|_| ZenithError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    let code = exit_code_of(&status);
    tracing::debug!("Command exited with {}", code);
    Ok(code)
}

/// Run a program directly (no shell) attached to the terminal.
///
/// Arguments are passed as-is, so user input never needs quoting. Exit codes
/// follow [`run_shell`].
pub fn run_program(program: &str, args: &[String], cwd: Option<&Path>) -> Result<i32> {
    tracing::debug!("Running {} {:?}", program, args);

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let status = cmd.status().map_err(|_| ZenithError::CommandFailed {
        command: program.to_string(),
        code: Some(super::exit::EXIT_NOT_FOUND),
    })?;

    Ok(exit_code_of(&status))
}

/// Execute a command with streaming output.
pub fn execute_streaming(
    command: &str,
    options: &CommandOptions,
    callback: OutputCallback,
) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = shell_command(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let spawn_failed = || ZenithError::CommandFailed {
        command: command.to_string(),
        code: None,
    };

    let mut child = cmd.spawn().map_err(|_| spawn_failed())?;
    let stdout = child.stdout.take().ok_or_else(spawn_failed)?;
    let stderr = child.stderr.take().ok_or_else(spawn_failed)?;

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        output
    });

    // git reports progress with carriage returns, so split on both.
    let stderr_handle = thread::spawn(move || {
        let mut reader = BufReader::new(stderr);
        let mut output = String::new();
        let mut buf = Vec::new();
        while reader.read_until(b'\n', &mut buf).map(|n| n > 0).unwrap_or(false) {
            let chunk = String::from_utf8_lossy(&buf).to_string();
            for part in chunk.split('\r') {
                let line = part.trim_end_matches('\n');
                if line.is_empty() {
                    continue;
                }
                output.push_str(line);
                output.push('\n');
                let _ = tx_stderr.send(OutputLine::Stderr(line.to_string()));
            }
            buf.clear();
        }
        output
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|_| spawn_failed())?;

    Ok(CommandResult::from_status(
        status,
        stdout_output,
        stderr_output,
        start.elapsed(),
    ))
}

/// Run a program (no shell) with a deadline.
///
/// Returns `Ok(None)` if the deadline passed; the child is killed in that
/// case. Output is discarded.
pub fn execute_with_timeout(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    let child = cmd.spawn()?;
    wait_with_timeout(child, timeout)
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();

    loop {
        match child.try_wait()? {
            Some(status) => return Ok(Some(status)),
            None => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

fn shell_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd"
    } else {
        "sh"
    }
}

fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else {
        "-c"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn execute_successful_command() {
        let options = CommandOptions {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        };

        let result = execute("echo hello", &options).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let options = CommandOptions {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        };

        let result = execute("exit 3", &options).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            capture_stdout: true,
            ..Default::default()
        };

        let result = execute("pwd", &options).unwrap();

        assert!(result.success);
        let name = temp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(result.stdout.contains(&name));
    }

    #[test]
    fn run_shell_returns_exit_code() {
        assert_eq!(run_shell("exit 0", None).unwrap(), 0);
        assert_eq!(run_shell("exit 7", None).unwrap(), 7);
    }

    #[test]
    fn run_shell_reports_command_not_found() {
        let code = run_shell("zenith-definitely-not-a-real-binary 2>/dev/null", None).unwrap();
        assert_eq!(code, 127);
    }

    #[test]
    fn run_shell_uses_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        run_shell("touch created.txt", Some(temp.path())).unwrap();
        assert!(temp.path().join("created.txt").exists());
    }

    #[test]
    fn run_program_passes_arguments_verbatim() {
        let temp = tempfile::TempDir::new().unwrap();
        let args: Vec<String> = ["-c", "echo \"$1\" > out.txt", "sh", "a b; c"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let code = run_program("sh", &args, Some(temp.path())).unwrap();
        assert_eq!(code, 0);
        let written = std::fs::read_to_string(temp.path().join("out.txt")).unwrap();
        assert_eq!(written.trim(), "a b; c");
    }

    #[test]
    fn run_program_missing_binary_is_an_error() {
        let err = run_program("zenith-definitely-not-a-real-binary", &[], None).unwrap_err();
        assert!(matches!(err, ZenithError::CommandFailed { code: Some(127), .. }));
    }

    #[test]
    fn execute_streaming_captures_output() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);

        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let options = CommandOptions::default();
        let result = execute_streaming("echo line1 && echo line2", &options, callback).unwrap();

        assert!(result.success);

        let captured = lines.lock().unwrap();
        assert!(captured.len() >= 2);
    }

    #[test]
    fn execute_streaming_splits_carriage_returns() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);

        let callback: OutputCallback = Box::new(move |line| {
            if let OutputLine::Stderr(s) = line {
                lines_clone.lock().unwrap().push(s);
            }
        });

        let options = CommandOptions::default();
        execute_streaming("printf 'a 10%%\\ra 100%%\\n' >&2", &options, callback).unwrap();

        let captured = lines.lock().unwrap();
        assert_eq!(captured.as_slice(), ["a 10%", "a 100%"]);
    }

    #[test]
    fn timeout_kills_slow_process() {
        let status =
            execute_with_timeout("sleep", &["5"], None, Duration::from_millis(200)).unwrap();
        assert!(status.is_none());
    }

    #[test]
    fn timeout_returns_status_for_fast_process() {
        let status = execute_with_timeout("sh", &["-c", "exit 4"], None, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        assert_eq!(status.code(), Some(4));
    }

    #[test]
    fn shell_quote_leaves_plain_paths_alone() {
        assert_eq!(shell_quote("/opt/tools/s3scanner"), "/opt/tools/s3scanner");
        assert_eq!(shell_quote("https://github.com/Mebus/cupp"), "https://github.com/Mebus/cupp");
        assert_eq!(shell_quote("/a b"), "'/a b'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn shell_quote_survives_the_shell() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("my tools");
        std::fs::create_dir(&dir).unwrap();
        let file = dir.join("it's here.txt");

        let command = format!("touch {}", shell_quote(&file.to_string_lossy()));
        assert_eq!(run_shell(&command, None).unwrap(), 0);
        assert!(file.exists());
    }

    #[test]
    fn timeout_child_with_noisy_stderr_finishes() {
        let status = execute_with_timeout(
            "sh",
            &["-c", "head -c 200000 /dev/zero >&2; exit 0"],
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(status.and_then(|s| s.code()), Some(0));
    }

    #[test]
    fn timeout_spawn_error_for_missing_program() {
        let result = execute_with_timeout(
            "zenith-definitely-not-a-real-binary",
            &[],
            None,
            Duration::from_secs(1),
        );
        assert!(result.is_err());
    }
}

//! Exit status classification.

use std::process::ExitStatus;

/// Exit code used for an install that ran past its deadline.
pub const EXIT_TIMEOUT: i32 = 124;
/// Exit code the shell uses for "command not found".
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code for a user interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// What a process exit code means to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Success,
    Timeout,
    NotFound,
    Interrupted,
    Failed(i32),
}

impl ExitKind {
    /// Classify a raw exit code.
    pub fn classify(code: i32) -> Self {
        match code {
            0 => ExitKind::Success,
            EXIT_TIMEOUT => ExitKind::Timeout,
            EXIT_NOT_FOUND => ExitKind::NotFound,
            EXIT_INTERRUPTED => ExitKind::Interrupted,
            other => ExitKind::Failed(other),
        }
    }

    /// Short human-readable description.
    pub fn describe(self) -> String {
        match self {
            ExitKind::Success => "succeeded".to_string(),
            ExitKind::Timeout => "timed out".to_string(),
            ExitKind::NotFound => "command not found".to_string(),
            ExitKind::Interrupted => "interrupted".to_string(),
            ExitKind::Failed(code) => format!("exited with code {}", code),
        }
    }
}

/// Flatten an exit status to a single code, mapping signal deaths to
/// `128 + signal`.
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_codes() {
        assert_eq!(ExitKind::classify(0), ExitKind::Success);
        assert_eq!(ExitKind::classify(124), ExitKind::Timeout);
        assert_eq!(ExitKind::classify(127), ExitKind::NotFound);
        assert_eq!(ExitKind::classify(130), ExitKind::Interrupted);
        assert_eq!(ExitKind::classify(2), ExitKind::Failed(2));
    }

    #[test]
    fn describe_failed_includes_code() {
        assert_eq!(ExitKind::Failed(3).describe(), "exited with code 3");
        assert_eq!(ExitKind::NotFound.describe(), "command not found");
    }

    #[cfg(unix)]
    #[test]
    fn signal_death_maps_to_128_plus_signal() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status for "killed by SIGINT".
        let status = ExitStatus::from_raw(2);
        assert_eq!(exit_code_of(&status), EXIT_INTERRUPTED);
    }

    #[cfg(unix)]
    #[test]
    fn normal_exit_passes_through() {
        use std::os::unix::process::ExitStatusExt;
        let status = ExitStatus::from_raw(5 << 8);
        assert_eq!(exit_code_of(&status), 5);
    }
}

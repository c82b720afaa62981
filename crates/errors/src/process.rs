//! External process supervision error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The executable could not be started at all (missing binary,
    /// permission denied). Distinct from any exit code.
    #[error("failed to launch {command}: {message}")]
    LaunchFailed { command: String, message: String },

    /// The process ran and exited non-zero.
    #[error("{command} exited with code {code}")]
    ExitFailure { command: String, code: i32 },

    /// The process was terminated without an exit code (signal).
    #[error("{command} terminated by signal")]
    Terminated { command: String },
}

impl ProcessError {
    /// The exit code carried by this error, when the process produced one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitFailure { code, .. } => Some(*code),
            Self::LaunchFailed { .. } | Self::Terminated { .. } => None,
        }
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the storeship submission engine
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling across task
//! boundaries.

use thiserror::Error;

pub mod config;
pub mod process;
pub mod remote;
pub mod submit;

// Re-export all error types at the root
pub use config::ConfigError;
pub use process::ProcessError;
pub use remote::RemoteError;
pub use submit::SubmitError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("process error: {0}")]
    Process(#[from] ProcessError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("submit error: {0}")]
    Submit(#[from] SubmitError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Whether this failure came from the remote system rejecting the
    /// supplied identity rather than from transport problems.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Remote(RemoteError::AuthenticationFailed { .. }))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

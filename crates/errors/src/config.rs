//! Configuration and wiring error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// An event was emitted before the log hub was activated.
    #[error("log hub is not active")]
    HubNotActive,

    /// The credential key file could not be written to its staging path.
    #[error("failed to stage credential key at {path}: {message}")]
    KeyStaging { path: String, message: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },

    #[error("parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("home directory unavailable")]
    HomeDirUnavailable,
}

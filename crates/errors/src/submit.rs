//! Submission request validation error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("unknown platform: {name}")]
    UnknownPlatform { name: String },
}

impl SubmitError {
    /// Convenience constructor used by request validation.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

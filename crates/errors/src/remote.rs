//! Remote release-management API error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The remote system rejected the supplied identity. Only `begin_edit`
    /// can observe this in practice since the bearer token is acquired on
    /// the first call of a session.
    #[error("authentication rejected: {message}")]
    AuthenticationFailed { message: String },

    #[error("request failed: {message}")]
    RequestFailed { message: String },

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl RemoteError {
    /// Transport-class failures are every remote failure that is not an
    /// identity rejection.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::AuthenticationFailed { .. })
    }
}

//! CLI error handling

use std::fmt;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Operations error
    Ops(storeship_errors::Error),
    /// A credential file could not be read or parsed
    CredentialFile { path: String, message: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => write!(f, "{e}"),
            CliError::CredentialFile { path, message } => {
                write!(f, "Credential file error ({path}): {message}")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Ops(e) => Some(e),
            CliError::CredentialFile { .. } => None,
        }
    }
}

impl From<storeship_errors::Error> for CliError {
    fn from(err: storeship_errors::Error) -> Self {
        CliError::Ops(err)
    }
}

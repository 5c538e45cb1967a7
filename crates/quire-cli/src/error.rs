//! Error types for quire-cli

use thiserror::Error;

/// Result type alias for quire-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quire-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from quire-core
    #[error("{0}")]
    Core(#[from] quire_core::Error),

    /// Error from quire-client
    #[error("{0}")]
    Client(#[from] quire_client::Error),

    /// Error from quire-auth
    #[error("{0}")]
    Auth(#[from] quire_auth::AuthError),

    /// Terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested action did not happen; the message is for the user
    #[error("{0}")]
    Failed(String),
}

impl Error {
    /// Creates a new failure from a user-facing message.
    pub fn failed<S: Into<String>>(message: S) -> Self {
        Error::Failed(message.into())
    }
}

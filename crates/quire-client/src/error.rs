//! Error types for quire-client

use thiserror::Error;

/// Result type alias for quire-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quire-client
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport failure or unreadable response body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token handling error
    #[error("Auth error: {0}")]
    Auth(#[from] quire_auth::AuthError),

    /// Base URL cannot be used to build endpoint URLs
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The server rejected the credentials
    #[error("{0}")]
    LoginFailed(String),

    /// The server rejected the bearer token (HTTP 401)
    #[error("Session expired or token rejected")]
    Unauthorized,

    /// The server refused the action (HTTP 403), e.g. the free plan note limit
    #[error("{0}")]
    Forbidden(String),

    /// The tenant upgrade was refused
    #[error("{0}")]
    UpgradeFailed(String),

    /// Any other non-success response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server message, or the canonical reason phrase
        message: String,
    },
}

impl Error {
    /// Whether the request never produced a usable response.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Whether the stored token should be discarded.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}

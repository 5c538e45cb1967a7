//! Auth-specific error types.

/// Errors that can occur while handling bearer tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token is available (never logged in, or logged out).
    #[error("missing authentication token")]
    MissingToken,

    /// Token format is invalid (not a decodable JWT).
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// The token payload lacks a claim the client needs.
    #[error("token missing {0} claim")]
    MissingClaim(&'static str),

    /// The token could not be read from or written to its store.
    #[error("token storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Whether signing in again would fix this error.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidFormat(_) | AuthError::MissingClaim(_)
        )
    }
}

impl From<std::io::Error> for AuthError {
    fn from(e: std::io::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

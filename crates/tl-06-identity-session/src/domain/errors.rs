//! Identity session errors.

use thiserror::Error;

/// Errors from login, restore and storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Login was attempted without a token.
    #[error("Invalid login data: missing identity token")]
    EmptyToken,

    /// The token is not a decodable JWT.
    #[error("Malformed identity token: {0}")]
    MalformedToken(String),

    /// The address oracle refused the claims.
    #[error("Address derivation failed: {0}")]
    Derivation(String),

    /// The session store failed.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// A session could not be serialized.
    #[error("Session serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

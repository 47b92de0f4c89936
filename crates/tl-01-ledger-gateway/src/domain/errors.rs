//! # Gateway Errors
//!
//! Transport and decode failures. The text of every variant keeps the
//! ledger's original message so callers can classify it.

use shared_types::ObjectId;
use thiserror::Error;

/// Ledger gateway error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// HTTP/connection failure before a response was received.
    #[error("Network error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },

    /// A referenced object does not exist (or was deleted).
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The transaction executed and aborted.
    #[error("Transaction failed: {0}")]
    ExecutionFailed(String),

    /// The signer refused or produced an invalid signature.
    #[error("Invalid signature: {0}")]
    SignatureRejected(String),

    /// An object exists but is not of the requested struct type.
    #[error("Unexpected object type: expected {expected}, found {found}")]
    UnexpectedType {
        /// Struct name that was expected
        expected: String,
        /// Struct type actually stored
        found: String,
    },

    /// The response did not have the expected shape.
    #[error("Failed to decode ledger response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Build a decode error for a missing or malformed field.
    pub fn field(name: &str, detail: impl std::fmt::Display) -> Self {
        Self::Decode(format!("field '{}': {}", name, detail))
    }
}

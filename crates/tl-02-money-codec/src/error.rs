//! Error types for the money/ID codec.

use thiserror::Error;

/// Codec errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Amount is negative, not a finite number, or out of range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The transaction result reports no created objects.
    #[error("Transaction created no objects")]
    NoCreatedObjects,
}

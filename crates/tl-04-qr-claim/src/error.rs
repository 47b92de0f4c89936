//! Encoding errors. Validation never fails; see [`crate::ClaimRejection`].

use thiserror::Error;

/// Failure to produce a QR code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QrError {
    /// The payload does not fit a QR symbol.
    #[error("Failed to generate QR code: {0}")]
    Render(String),

    /// The payload could not be serialized.
    #[error("Failed to serialize QR payload: {0}")]
    Serialize(String),
}

//! # TL-04 QR Claim Codec
//!
//! Scannable ticket claims: what a ticket holder shows at the gate, and how
//! the gate decides whether to believe it.
//!
//! **Component ID:** 4
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Payload Contract
//!
//! | Field       | Type   | Required |
//! |-------------|--------|----------|
//! | `ticketId`  | string | yes      |
//! | `platform`  | string | no       |
//! | `network`   | string | no       |
//! | `packageId` | string | no       |
//! | `timestamp` | u64 ms | no       |
//!
//! Unknown fields are tolerated. Non-JSON text is a bare ticket id.
//!
//! ## Module Structure
//!
//! ```text
//! tl-04-qr-claim/
//! ├── domain/
//! │   ├── claim.rs    # QrClaim, decode_claim
//! │   ├── render.rs   # SVG rendering, data URLs
//! │   └── verdict.rs  # ValidationResult, ClaimRejection
//! ├── ports/          # ClaimVerifier
//! ├── application/    # QrClaimService
//! └── error.rs        # QrError (encoding only)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports
pub use application::{EncodedClaim, QrClaimService};
pub use domain::{
    decode_claim, render_svg, svg_data_url, ClaimOutcome, ClaimRejection, QrClaim,
    ValidationResult, QR_MIN_SIZE,
};
pub use error::QrError;
pub use ports::ClaimVerifier;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

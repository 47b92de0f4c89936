//! Application layer for the QR claim codec.

pub mod service;

pub use service::{EncodedClaim, QrClaimService};

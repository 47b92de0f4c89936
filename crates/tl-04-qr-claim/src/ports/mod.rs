//! Ports for the QR claim codec.

pub mod inbound;

pub use inbound::ClaimVerifier;

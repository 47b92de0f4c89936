//! # Outbound Ports
//!
//! The identity-to-address oracle and the local session storage.

use shared_types::Address;

use crate::domain::{IdentityClaims, SessionError};

/// Maps identity claims to a ledger address.
///
/// The same claims must always map to the same address.
pub trait AddressDeriver: Send + Sync {
    /// Derive the address for `claims`.
    fn derive(&self, claims: &IdentityClaims) -> Result<Address, SessionError>;
}

/// Single-slot storage for the serialized session.
///
/// Values are opaque text so that a corrupted record can still be read,
/// detected and cleared.
pub trait SessionStore: Send + Sync {
    /// Stored text, if any.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Replace the stored text.
    fn save(&self, data: &str) -> Result<(), SessionError>;

    /// Remove the stored text. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionError>;
}

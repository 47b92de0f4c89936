//! Ports for the identity session manager.

pub mod outbound;

pub use outbound::{AddressDeriver, SessionStore};

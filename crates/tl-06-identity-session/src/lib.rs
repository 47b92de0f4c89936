//! # TL-06 Identity Session Manager
//!
//! Social login to ledger address, and the expiring local session the UI
//! gates on.
//!
//! **Component ID:** 6
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! Proof generation and signature checks on the identity token belong to
//! external services. This crate decodes the token, asks an
//! [`AddressDeriver`] for the address and keeps the session in a
//! [`SessionStore`].
//!
//! ## Module Structure
//!
//! ```text
//! tl-06-identity-session/
//! ├── domain/       # IdentityAssertion, EphemeralKeyCache, Session, SessionError
//! ├── ports/        # AddressDeriver, SessionStore
//! ├── adapters/     # SaltedDigestDeriver, InMemorySessionStore, FileSessionStore
//! └── application/  # IdentitySessionManager
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FileSessionStore, InMemorySessionStore, SaltedDigestDeriver};
pub use application::IdentitySessionManager;
pub use domain::{
    EphemeralKey, EphemeralKeyCache, IdentityAssertion, IdentityClaims, Session, SessionError,
    UserProfile, EPHEMERAL_KEY_TTL_MS, SESSION_TTL_MS,
};
pub use ports::{AddressDeriver, SessionStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Domain layer for identity sessions.

pub mod assertion;
pub mod ephemeral;
pub mod errors;
pub mod session;

pub use assertion::{IdentityAssertion, IdentityClaims};
pub use ephemeral::{EphemeralKey, EphemeralKeyCache, EPHEMERAL_KEY_TTL_MS};
pub use errors::SessionError;
pub use session::{Session, UserProfile, SESSION_TTL_MS};

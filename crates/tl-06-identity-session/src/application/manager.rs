//! # Identity Session Manager
//!
//! ```text
//! login(token, profile)
//!   ├── IdentityAssertion::parse
//!   ├── AddressDeriver::derive      → ledger address
//!   ├── EphemeralKeyCache::current  → public key (reused ≤ 15 min)
//!   └── SessionStore::save          → expires_at = now + 30 min
//!
//! restore()
//!   ├── nothing stored     → None
//!   ├── unreadable record  → clear, None
//!   ├── expired            → clear, None
//!   └── otherwise          → Some(session)
//! ```
//!
//! Failed logins clear whatever was stored before.

use tracing::{info, warn};
use uuid::Uuid;

use shared_types::TimeSource;

use crate::domain::{
    EphemeralKeyCache, IdentityAssertion, Session, SessionError, UserProfile, SESSION_TTL_MS,
};
use crate::ports::{AddressDeriver, SessionStore};

/// Identity Session Manager - local, expiring sessions.
pub struct IdentitySessionManager<S, D, T>
where
    S: SessionStore,
    D: AddressDeriver,
    T: TimeSource + Clone,
{
    store: S,
    deriver: D,
    clock: T,
    keys: EphemeralKeyCache<T>,
    ttl_ms: u64,
}

impl<S, D, T> IdentitySessionManager<S, D, T>
where
    S: SessionStore,
    D: AddressDeriver,
    T: TimeSource + Clone,
{
    /// Create a manager with the standard 30 minute session lifetime.
    pub fn new(store: S, deriver: D, clock: T) -> Self {
        Self {
            keys: EphemeralKeyCache::new(clock.clone()),
            store,
            deriver,
            clock,
            ttl_ms: SESSION_TTL_MS,
        }
    }

    /// Start a session from an identity token.
    pub fn login(&self, token: &str, profile: UserProfile) -> Result<Session, SessionError> {
        match self.create_session(token, profile) {
            Ok(session) => {
                info!(
                    "[tl-06] Logged in {} via {} (session {})",
                    session.address, session.provider, session.session_id
                );
                Ok(session)
            }
            Err(e) => {
                warn!("[tl-06] Login failed: {}", e);
                self.clear_quietly();
                Err(e)
            }
        }
    }

    fn create_session(&self, token: &str, profile: UserProfile) -> Result<Session, SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let assertion = IdentityAssertion::parse(token)?;
        let address = self.deriver.derive(assertion.claims())?;
        let key = self.keys.current();
        let now = self.clock.now();

        let session = Session {
            session_id: Uuid::new_v4().to_string(),
            provider: assertion.provider(),
            token: assertion.token().to_string(),
            nonce: Uuid::new_v4().to_string(),
            profile: profile.or_claims(assertion.claims()),
            address,
            ephemeral_public_key: key.public_key_base64(),
            created_at: now,
            expires_at: now + self.ttl_ms,
        };
        let data = serde_json::to_string(&session)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;
        self.store.save(&data)?;
        Ok(session)
    }

    /// The stored session, if present and unexpired.
    pub fn restore(&self) -> Result<Option<Session>, SessionError> {
        let Some(data) = self.store.load()? else {
            return Ok(None);
        };
        let session: Session = match serde_json::from_str(&data) {
            Ok(session) => session,
            Err(e) => {
                warn!("[tl-06] Discarding unreadable session: {}", e);
                self.store.clear()?;
                return Ok(None);
            }
        };
        if session.is_active(self.clock.now()) {
            Ok(Some(session))
        } else {
            info!("[tl-06] Session {} expired", session.session_id);
            self.store.clear()?;
            Ok(None)
        }
    }

    /// End the session.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        info!("[tl-06] Logged out");
        Ok(())
    }

    /// Whether an unexpired session exists. Storage errors count as no.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.restore(), Ok(Some(_)))
    }

    fn clear_quietly(&self) {
        if let Err(e) = self.store.clear() {
            warn!("[tl-06] Failed to clear session: {}", e);
        }
    }
}

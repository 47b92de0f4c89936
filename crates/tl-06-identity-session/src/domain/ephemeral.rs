//! # Ephemeral Keys
//!
//! The per-login Ed25519 keypair the proving service binds into the
//! session nonce. One cache per process, with its clock injected; a key is
//! reused for [`EPHEMERAL_KEY_TTL_MS`] and then replaced.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{SigningKey, VerifyingKey};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use shared_types::{TimeSource, Timestamp};
use tracing::debug;

/// Reuse window for an ephemeral key.
pub const EPHEMERAL_KEY_TTL_MS: u64 = 15 * 60 * 1000;

/// A generated keypair.
#[derive(Clone)]
pub struct EphemeralKey {
    signing: SigningKey,
    created_at: Timestamp,
}

impl EphemeralKey {
    fn generate(created_at: Timestamp) -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
            created_at,
        }
    }

    /// Public half.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// Public key, standard base64.
    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public_key().as_bytes())
    }

    /// Private half, for the signer.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing
    }

    /// Generation time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl std::fmt::Debug for EphemeralKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKey")
            .field("public", &self.public_key_base64())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Time-bounded ephemeral key cache.
pub struct EphemeralKeyCache<T: TimeSource> {
    clock: T,
    ttl_ms: u64,
    cached: Mutex<Option<EphemeralKey>>,
}

impl<T: TimeSource> EphemeralKeyCache<T> {
    /// Cache with the standard 15 minute reuse window.
    pub fn new(clock: T) -> Self {
        Self::with_ttl(clock, EPHEMERAL_KEY_TTL_MS)
    }

    /// Cache with a custom reuse window.
    pub fn with_ttl(clock: T, ttl_ms: u64) -> Self {
        Self {
            clock,
            ttl_ms,
            cached: Mutex::new(None),
        }
    }

    /// The cached key, or a fresh one if none is younger than the window.
    pub fn current(&self) -> EphemeralKey {
        let now = self.clock.now();
        let mut cached = self.cached.lock();
        match cached.as_ref() {
            Some(key) if now.saturating_sub(key.created_at) < self.ttl_ms => key.clone(),
            _ => {
                let key = EphemeralKey::generate(now);
                debug!("[tl-06] New ephemeral key {}", key.public_key_base64());
                *cached = Some(key.clone());
                key
            }
        }
    }

    /// Drop the cached key.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}

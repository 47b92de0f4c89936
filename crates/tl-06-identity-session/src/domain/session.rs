//! Stored session record.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Timestamp};

use super::assertion::IdentityClaims;

/// Lifetime of a local session.
pub const SESSION_TTL_MS: u64 = 30 * 60 * 1000;

/// Display profile shown by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
}

impl UserProfile {
    /// Fill absent fields from the token claims.
    pub fn or_claims(self, claims: &IdentityClaims) -> Self {
        Self {
            name: self.name.or_else(|| claims.name.clone()),
            email: self.email.or_else(|| claims.email.clone()),
            picture: self.picture.or_else(|| claims.picture.clone()),
        }
    }
}

/// An authenticated local session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Random session id.
    pub session_id: String,
    /// Identity provider, e.g. `google`.
    pub provider: String,
    /// Identity token the session was created from.
    pub token: String,
    /// Random nonce bound to the ephemeral key.
    pub nonce: String,
    /// Display profile.
    pub profile: UserProfile,
    /// Derived ledger address.
    pub address: Address,
    /// Ephemeral public key, base64.
    pub ephemeral_public_key: String,
    /// Creation time, epoch ms.
    pub created_at: Timestamp,
    /// Expiry time, epoch ms.
    pub expires_at: Timestamp,
}

impl Session {
    /// Still usable at `now`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }

    /// Milliseconds left, zero once expired.
    pub fn remaining_ms(&self, now: Timestamp) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

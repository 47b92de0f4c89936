//! # Inbound Ports
//!
//! What a gate needs from the codec: turn a scanned payload into a verdict.

use async_trait::async_trait;

use crate::domain::{QrClaim, ValidationResult};

/// Claim verification - inbound port.
///
/// Both methods always produce a verdict. Rejections are carried in the
/// result rather than returned as errors.
#[async_trait]
pub trait ClaimVerifier: Send + Sync {
    /// Check a decoded claim against configuration and live ledger state.
    async fn validate(&self, claim: &QrClaim) -> ValidationResult;

    /// Decode then validate a raw scanned payload.
    async fn verify_payload(&self, payload: &str) -> ValidationResult;
}

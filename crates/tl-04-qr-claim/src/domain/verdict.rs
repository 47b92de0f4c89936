//! Validation verdicts. Every outcome is a value; nothing here is thrown
//! past the codec.

use serde::Serialize;
use shared_types::{Network, Ticket, Timestamp};
use thiserror::Error;

/// Why a scanned claim was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum ClaimRejection {
    /// No ticket id could be read from the payload.
    #[error("{0}")]
    InvalidPayload(String),

    /// The claim was issued for another network.
    #[error("QR code is for {claimed} but app is connected to {configured}")]
    NetworkMismatch {
        /// Network named in the claim.
        claimed: String,
        /// Network this client is configured for.
        configured: Network,
    },

    /// The claim was issued by another marketplace package.
    #[error("Invalid QR code: Wrong platform or outdated ticket")]
    PlatformMismatch {
        /// Package named in the claim.
        claimed: String,
    },

    /// The ticket does not exist on the ledger.
    #[error("Ticket not found or invalid")]
    NotFound {
        /// Claimed ticket id.
        ticket_id: String,
    },

    /// The ledger could not be asked.
    #[error("Ticket lookup failed: {0}")]
    LookupFailed(String),
}

impl ClaimRejection {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::NetworkMismatch { .. } => "network_mismatch",
            Self::PlatformMismatch { .. } => "platform_mismatch",
            Self::NotFound { .. } => "not_found",
            Self::LookupFailed(_) => "lookup_failed",
        }
    }
}

/// Outcome half of a [`ValidationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// The ticket exists and the claim matches this deployment.
    Valid {
        /// Live ticket state.
        ticket: Ticket,
        /// Claimed platform, `"Unknown"` when absent.
        platform: String,
        /// When the claim was first issued, if it says.
        original_timestamp: Option<u64>,
        /// Whether the ticket was minted by a verified seller.
        is_original_issuer: bool,
    },
    /// The claim was rejected.
    Rejected(ClaimRejection),
}

/// Verdict for one scanned claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Ticket id the claim named, if any could be read.
    pub ticket_id: Option<String>,
    /// Validation time, epoch milliseconds.
    pub scanned_at: Timestamp,
    /// Network the client is configured for.
    pub network: Network,
    /// Accept or reject.
    pub outcome: ClaimOutcome,
}

impl ValidationResult {
    /// True for accepted claims.
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, ClaimOutcome::Valid { .. })
    }

    /// The live ticket, for accepted claims.
    pub fn ticket(&self) -> Option<&Ticket> {
        match &self.outcome {
            ClaimOutcome::Valid { ticket, .. } => Some(ticket),
            ClaimOutcome::Rejected(_) => None,
        }
    }

    /// The rejection, for refused claims.
    pub fn rejection(&self) -> Option<&ClaimRejection> {
        match &self.outcome {
            ClaimOutcome::Rejected(rejection) => Some(rejection),
            ClaimOutcome::Valid { .. } => None,
        }
    }

    /// User-facing error message, for refused claims.
    pub fn error_message(&self) -> Option<String> {
        self.rejection().map(ToString::to_string)
    }
}

//! # QR Claim Service
//!
//! Encodes claims for ticket holders and validates scanned claims at the
//! gate. Validation order:
//!
//! 1. `network` present and different from ours → `NetworkMismatch`
//! 2. `packageId` present and different from ours → `PlatformMismatch`
//! 3. live ticket read → `NotFound` / `LookupFailed` / valid
//!
//! Empty `network`/`packageId` strings are treated as absent. The ticket
//! read only accepts our package's `ticket::Ticket`; anything else is
//! `NotFound`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use shared_types::{MarketplaceConfig, ObjectId, ObjectTypes, TimeSource};
use tl_01_ledger_gateway::{decode_ticket, GatewayError, LedgerGateway};

use crate::domain::claim::build_payload;
use crate::domain::{
    decode_claim, render_svg, svg_data_url, ClaimOutcome, ClaimRejection, QrClaim,
    ValidationResult,
};
use crate::error::QrError;
use crate::ports::ClaimVerifier;

const UNKNOWN_PLATFORM: &str = "Unknown";

/// A rendered claim, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedClaim {
    /// Ticket the claim is for.
    pub ticket_id: String,
    /// Textual payload carried by the QR code.
    pub payload: String,
    /// SVG rendering of the QR code.
    pub svg: String,
    /// `data:` URL of the SVG.
    pub data_url: String,
}

/// QR Claim Service - encode and validate ticket claims.
pub struct QrClaimService<G: LedgerGateway, T: TimeSource> {
    gateway: Arc<G>,
    config: MarketplaceConfig,
    types: ObjectTypes,
    clock: T,
}

impl<G: LedgerGateway, T: TimeSource> QrClaimService<G, T> {
    /// Create a service for the deployment described by `config`.
    pub fn new(gateway: Arc<G>, config: MarketplaceConfig, clock: T) -> Self {
        let types = config.object_types();
        Self {
            gateway,
            config,
            types,
            clock,
        }
    }

    /// Encode a claim for `ticket_id`. `context` entries are merged into the
    /// payload after the base fields and override them.
    pub fn encode(
        &self,
        ticket_id: &ObjectId,
        context: &Map<String, Value>,
    ) -> Result<EncodedClaim, QrError> {
        let payload = build_payload(
            ticket_id.as_str(),
            &self.config.platform,
            self.config.network.as_str(),
            self.config.package_id.as_str(),
            self.clock.now(),
            context,
        );
        let payload = serde_json::to_string(&Value::Object(payload))
            .map_err(|e| QrError::Serialize(e.to_string()))?;
        let svg = render_svg(&payload)?;
        let data_url = svg_data_url(&svg);
        info!(
            "[tl-04] QR code generated for ticket {} on {}",
            ticket_id, self.config.network
        );
        Ok(EncodedClaim {
            ticket_id: ticket_id.to_string(),
            payload,
            svg,
            data_url,
        })
    }

    fn result(&self, ticket_id: Option<String>, outcome: ClaimOutcome) -> ValidationResult {
        if let ClaimOutcome::Rejected(rejection) = &outcome {
            warn!(
                "[tl-04] QR validation failed on {}: {}",
                self.config.network, rejection
            );
        }
        ValidationResult {
            ticket_id,
            scanned_at: self.clock.now(),
            network: self.config.network,
            outcome,
        }
    }

    fn check_deployment(&self, claim: &QrClaim) -> Result<(), ClaimRejection> {
        if let Some(network) = claim.network.as_deref().filter(|n| !n.is_empty()) {
            if network != self.config.network.as_str() {
                return Err(ClaimRejection::NetworkMismatch {
                    claimed: network.to_string(),
                    configured: self.config.network,
                });
            }
        }
        if let Some(package) = claim.package_id.as_deref().filter(|p| !p.is_empty()) {
            if package != self.config.package_id.as_str() {
                return Err(ClaimRejection::PlatformMismatch {
                    claimed: package.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<G, T> ClaimVerifier for QrClaimService<G, T>
where
    G: LedgerGateway + 'static,
    T: TimeSource + 'static,
{
    async fn validate(&self, claim: &QrClaim) -> ValidationResult {
        let ticket_id = Some(claim.ticket_id.clone());
        if let Err(rejection) = self.check_deployment(claim) {
            return self.result(ticket_id, ClaimOutcome::Rejected(rejection));
        }

        let id = ObjectId::new(claim.ticket_id.as_str());
        let ticket = match self.gateway.read_object(&id).await {
            Ok(Some(raw)) => match raw
                .require_type(&self.types.ticket)
                .and_then(|()| decode_ticket(&raw))
            {
                Ok(ticket) => Some(ticket),
                Err(GatewayError::UnexpectedType { .. }) => None,
                Err(e) => {
                    let rejection = ClaimRejection::LookupFailed(e.to_string());
                    return self.result(ticket_id, ClaimOutcome::Rejected(rejection));
                }
            },
            Ok(None) => None,
            Err(e) => {
                let rejection = ClaimRejection::LookupFailed(e.to_string());
                return self.result(ticket_id, ClaimOutcome::Rejected(rejection));
            }
        };

        let Some(ticket) = ticket else {
            let rejection = ClaimRejection::NotFound {
                ticket_id: claim.ticket_id.clone(),
            };
            return self.result(ticket_id, ClaimOutcome::Rejected(rejection));
        };

        info!(
            "[tl-04] QR validated: ticket {} '{}' on {}",
            ticket.id, ticket.event_name, self.config.network
        );
        let is_original_issuer = ticket.original_issuer_verified;
        self.result(
            ticket_id,
            ClaimOutcome::Valid {
                ticket,
                platform: claim
                    .platform
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_PLATFORM.to_string()),
                original_timestamp: claim.issued_at(),
                is_original_issuer,
            },
        )
    }

    async fn verify_payload(&self, payload: &str) -> ValidationResult {
        match decode_claim(payload) {
            Ok(claim) => self.validate(&claim).await,
            Err(rejection) => self.result(None, ClaimOutcome::Rejected(rejection)),
        }
    }
}

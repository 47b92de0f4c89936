//! # Gate Flow
//!
//! A minted ticket is encoded as a QR claim, then scanned at the gate.
//! One clock drives both the encoder and the gate session.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fixtures::Marketplace;
    use serde_json::{json, Map};
    use shared_types::{MockTimeSource, Ticket};
    use tl_01_ledger_gateway::{InMemoryLedger, TransactionSigner};
    use tl_03_ticket_lifecycle::TicketLifecycleApi;
    use tl_04_qr_claim::{ClaimOutcome, ClaimRejection, ClaimVerifier, QrClaimService};
    use tl_05_gate_scan::{GateScanSession, DUPLICATE_WARNING};

    const NOW: u64 = 1_733_011_200_000;
    const MINUTE: u64 = 60_000;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Gate {
        clock: Arc<MockTimeSource>,
        qr: QrClaimService<InMemoryLedger, Arc<MockTimeSource>>,
        session: GateScanSession<Arc<MockTimeSource>>,
    }

    fn gate(m: &Marketplace) -> Gate {
        let clock = Arc::new(MockTimeSource::new(NOW));
        Gate {
            qr: QrClaimService::new(m.ledger.clone(), m.config.clone(), clock.clone()),
            session: GateScanSession::new(clock.clone()),
            clock,
        }
    }

    async fn verified_ticket(m: &Marketplace) -> Ticket {
        m.lifecycle
            .grant_seller_badge(&m.admin.address(), &m.seller.address(), &m.admin)
            .await
            .unwrap();
        m.lifecycle
            .mint("Concert", "2025-12-01", "cidABC", &m.seller)
            .await
            .unwrap()
    }

    // =========================================================================
    // SCANS
    // =========================================================================

    #[tokio::test]
    async fn test_encoded_ticket_scans_valid_then_duplicate() {
        let m = Marketplace::new();
        let mut g = gate(&m);
        let ticket = verified_ticket(&m).await;

        let mut context = Map::new();
        context.insert("eventName".to_string(), json!(ticket.event_name));
        let encoded = g.qr.encode(&ticket.id, &context).unwrap();
        assert!(encoded.data_url.starts_with("data:image/svg+xml;base64,"));

        let first = g.session.scan_payload(&g.qr, &encoded.payload).await;
        assert!(first.is_valid());
        assert!(!first.is_duplicate);
        match &first.result.outcome {
            ClaimOutcome::Valid {
                ticket: scanned,
                platform,
                original_timestamp,
                is_original_issuer,
            } => {
                assert_eq!(scanned.id, ticket.id);
                assert_eq!(platform, &m.config.platform);
                assert_eq!(*original_timestamp, Some(NOW));
                assert!(*is_original_issuer);
            }
            other => panic!("expected a valid claim, got {:?}", other),
        }

        g.clock.advance(4 * MINUTE);
        let second = g.session.scan_payload(&g.qr, &encoded.payload).await;
        assert!(second.is_valid());
        assert!(second.is_duplicate);
        assert_eq!(second.warning.as_deref(), Some(DUPLICATE_WARNING));

        g.clock.advance(6 * MINUTE);
        let third = g.session.scan_payload(&g.qr, &encoded.payload).await;
        assert!(!third.is_duplicate);

        let stats = g.session.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.valid, 3);
        assert_eq!(stats.duplicate, 1);
        assert_eq!(g.session.success_rate(), 100.0);
    }

    #[tokio::test]
    async fn test_bare_ticket_id_scans() {
        let m = Marketplace::new();
        let mut g = gate(&m);
        let ticket = verified_ticket(&m).await;

        let record = g.session.scan_payload(&g.qr, ticket.id.as_str()).await;
        assert!(record.is_valid());
        assert_eq!(record.ticket_id(), Some(ticket.id.as_str()));
    }

    #[tokio::test]
    async fn test_foreign_claims_rejected_at_gate() {
        let m = Marketplace::new();
        let mut g = gate(&m);
        let ticket = verified_ticket(&m).await;

        let wrong_network = json!({
            "ticketId": ticket.id.as_str(),
            "network": "mainnet",
        })
        .to_string();
        let record = g.session.scan_payload(&g.qr, &wrong_network).await;
        assert!(matches!(
            record.result.rejection(),
            Some(ClaimRejection::NetworkMismatch { .. })
        ));
        assert!(record
            .error()
            .unwrap()
            .starts_with("QR code is for mainnet but app is connected to"));

        let wrong_package = json!({
            "ticketId": ticket.id.as_str(),
            "packageId": "0xsomeoneelse",
        })
        .to_string();
        let record = g.session.scan_payload(&g.qr, &wrong_package).await;
        assert_eq!(
            record.error().as_deref(),
            Some("Invalid QR code: Wrong platform or outdated ticket")
        );

        let record = g.session.scan_payload(&g.qr, "0xnothere").await;
        assert_eq!(record.error().as_deref(), Some("Ticket not found or invalid"));

        let record = g.session.scan_payload(&g.qr, "   ").await;
        assert_eq!(record.ticket_id(), None);
        assert!(!record.is_duplicate);

        let stats = g.session.statistics();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.invalid, 4);
        assert_eq!(g.session.success_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_verifier_without_session() {
        let m = Marketplace::new();
        let g = gate(&m);
        let ticket = verified_ticket(&m).await;

        let encoded = g.qr.encode(&ticket.id, &Map::new()).unwrap();
        let result = g.qr.verify_payload(&encoded.payload).await;
        assert!(result.is_valid());
        assert_eq!(result.scanned_at, NOW);
        assert_eq!(result.network, m.config.network);
    }
}

//! # Gate Scan Session
//!
//! In-memory state for one gate: recent scans (newest first, bounded) and
//! a running tally. Recording is synchronous and does no I/O; only
//! [`GateScanSession::scan_payload`] awaits the claim verifier.
//!
//! Duplicates are flagged, never refused. Admission stays with the
//! operator.

use std::collections::VecDeque;
use tracing::{info, warn};

use shared_types::{to_rfc3339, TimeSource};
use tl_04_qr_claim::{ClaimVerifier, ValidationResult};
use tl_telemetry::{metric_inc, GATE_SCANS};

use crate::domain::{GateScanConfig, ScanRecord, ScanStatistics, DUPLICATE_WARNING};

/// Gate Scan Session - duplicate detection and statistics.
pub struct GateScanSession<T: TimeSource> {
    config: GateScanConfig,
    clock: T,
    history: VecDeque<ScanRecord>,
    stats: ScanStatistics,
    last_id: u64,
}

impl<T: TimeSource> GateScanSession<T> {
    /// Create a session with default limits.
    pub fn new(clock: T) -> Self {
        Self::with_config(GateScanConfig::default(), clock)
    }

    /// Create a session with explicit limits.
    pub fn with_config(config: GateScanConfig, clock: T) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_limit),
            config,
            clock,
            stats: ScanStatistics::default(),
            last_id: 0,
        }
    }

    /// Record one verdict.
    pub fn record_scan(&mut self, result: ValidationResult) -> ScanRecord {
        let now = self.clock.now();
        // Timestamp-derived, bumped when two scans share a millisecond.
        let id = now.max(self.last_id + 1);
        self.last_id = id;

        let is_duplicate = self.seen_recently(result.ticket_id.as_deref(), now);
        let record = ScanRecord {
            id,
            timestamp: now,
            is_duplicate,
            warning: is_duplicate.then(|| DUPLICATE_WARNING.to_string()),
            result,
        };

        self.stats.total += 1;
        if record.is_valid() {
            self.stats.valid += 1;
            metric_inc!(GATE_SCANS, &["valid"]);
        } else {
            self.stats.invalid += 1;
            metric_inc!(GATE_SCANS, &["invalid"]);
        }
        if is_duplicate {
            self.stats.duplicate += 1;
            metric_inc!(GATE_SCANS, &["duplicate"]);
            warn!(
                "[tl-05] Duplicate scan of ticket {} at {}",
                record.ticket_id().unwrap_or("?"),
                to_rfc3339(now)
            );
        }
        info!(
            "[tl-05] Scan {} {}: total={} valid={} invalid={} duplicate={}",
            record.id,
            if record.is_valid() { "VALID" } else { "INVALID" },
            self.stats.total,
            self.stats.valid,
            self.stats.invalid,
            self.stats.duplicate
        );

        self.history.push_front(record.clone());
        self.history.truncate(self.config.history_limit);
        record
    }

    fn seen_recently(&self, ticket_id: Option<&str>, now: u64) -> bool {
        let Some(ticket_id) = ticket_id else {
            return false;
        };
        self.history.iter().any(|scan| {
            scan.ticket_id() == Some(ticket_id)
                && now.saturating_sub(scan.timestamp) < self.config.duplicate_window_ms
        })
    }

    /// Decode, validate and record a raw scanned payload.
    pub async fn scan_payload<V>(&mut self, verifier: &V, payload: &str) -> ScanRecord
    where
        V: ClaimVerifier + ?Sized,
    {
        let result = verifier.verify_payload(payload).await;
        self.record_scan(result)
    }

    /// Clear history and tallies.
    pub fn reset(&mut self) {
        self.history.clear();
        self.stats = ScanStatistics::default();
        info!("[tl-05] Gate session reset");
    }

    /// Most recent scan.
    pub fn current(&self) -> Option<&ScanRecord> {
        self.history.front()
    }

    /// Recent scans, newest first.
    pub fn history(&self) -> impl Iterator<Item = &ScanRecord> {
        self.history.iter()
    }

    /// Number of scans in the history buffer.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Running tally.
    pub fn statistics(&self) -> ScanStatistics {
        self.stats
    }

    /// Success rate in percent, one decimal.
    pub fn success_rate(&self) -> f64 {
        self.stats.success_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::{MarketplaceConfig, MockTimeSource, Network};
    use std::sync::Arc;
    use tl_01_ledger_gateway::{InMemoryLedger, RawObject};
    use tl_04_qr_claim::{ClaimOutcome, ClaimRejection, QrClaimService};

    const T0: u64 = 1_733_011_200_000;
    const MINUTE: u64 = 60_000;

    fn rejected(ticket_id: &str) -> ValidationResult {
        ValidationResult {
            ticket_id: Some(ticket_id.to_string()),
            scanned_at: T0,
            network: Network::Localnet,
            outcome: ClaimOutcome::Rejected(ClaimRejection::NotFound {
                ticket_id: ticket_id.to_string(),
            }),
        }
    }

    fn session() -> (Arc<MockTimeSource>, GateScanSession<Arc<MockTimeSource>>) {
        let clock = Arc::new(MockTimeSource::new(T0));
        (clock.clone(), GateScanSession::new(clock))
    }

    #[test]
    fn test_duplicate_window() {
        let (clock, mut session) = session();
        assert!(!session.record_scan(rejected("T")).is_duplicate);

        clock.advance(4 * MINUTE);
        let second = session.record_scan(rejected("T"));
        assert!(second.is_duplicate);
        assert_eq!(second.warning.as_deref(), Some(DUPLICATE_WARNING));

        let (clock, mut session) = self::session();
        session.record_scan(rejected("T"));
        clock.advance(6 * MINUTE);
        assert!(!session.record_scan(rejected("T")).is_duplicate);
    }

    #[test]
    fn test_different_tickets_are_not_duplicates() {
        let (_, mut session) = session();
        session.record_scan(rejected("A"));
        assert!(!session.record_scan(rejected("B")).is_duplicate);
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let (clock, mut session) = session();
        for i in 0..120 {
            session.record_scan(rejected(&format!("T{}", i)));
            clock.advance(1);
            assert!(session.history_len() <= 50);
        }
        assert_eq!(session.history_len(), 50);
        assert_eq!(session.current().and_then(ScanRecord::ticket_id), Some("T119"));
        assert_eq!(session.history().last().and_then(ScanRecord::ticket_id), Some("T70"));
        assert_eq!(session.statistics().total, 120);
    }

    #[test]
    fn test_ids_strictly_increase_within_a_millisecond() {
        let (_, mut session) = session();
        let a = session.record_scan(rejected("A")).id;
        let b = session.record_scan(rejected("B")).id;
        let c = session.record_scan(rejected("C")).id;
        assert_eq!(a, T0);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_reset() {
        let (_, mut session) = session();
        session.record_scan(rejected("A"));
        session.record_scan(rejected("A"));
        session.reset();
        assert_eq!(session.statistics(), ScanStatistics::default());
        assert!(session.current().is_none());
        assert_eq!(session.success_rate(), 0.0);
        // History is gone, so the next scan is fresh.
        assert!(!session.record_scan(rejected("A")).is_duplicate);
    }

    #[tokio::test]
    async fn test_scan_payload_tallies() {
        let config = MarketplaceConfig::for_testing();
        let ledger = Arc::new(InMemoryLedger::from_config(&config));
        ledger.insert_object(
            RawObject::from_rpc_data(&json!({
                "objectId": "0xt1",
                "version": "1",
                "type": ledger.object_types().ticket,
                "owner": { "AddressOwner": "0xholder" },
                "content": { "fields": {
                    "event_name": "Concert",
                    "event_date": "2025-12-01",
                    "ipfs_cid": "cidABC",
                    "original_issuer_verified": true,
                }}
            }))
            .unwrap(),
        );
        let (clock, mut session) = session();
        let verifier = QrClaimService::new(ledger, config, clock.clone());

        assert!(session.scan_payload(&verifier, "0xt1").await.is_valid());
        clock.advance(MINUTE);
        let repeat = session.scan_payload(&verifier, "0xt1").await;
        assert!(repeat.is_valid());
        assert!(repeat.is_duplicate);
        let bad = session
            .scan_payload(&verifier, r#"{"ticketId":"0xt1","network":"mainnet"}"#)
            .await;
        assert!(!bad.is_valid());
        assert!(bad.error().is_some());
        session.scan_payload(&verifier, "0xt1").await;

        let stats = session.statistics();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.valid, 3);
        assert_eq!(stats.invalid, 1);
        assert_eq!(stats.duplicate, 3);
        assert_eq!(session.success_rate(), 75.0);
    }
}

//! Scan records, tallies and session configuration.

use serde::Serialize;
use shared_types::Timestamp;
use tl_04_qr_claim::ValidationResult;

/// Warning attached to a repeated scan.
pub const DUPLICATE_WARNING: &str = "This ticket was scanned recently";

/// Gate session configuration.
#[derive(Clone, Debug)]
pub struct GateScanConfig {
    /// Records kept in the recent-history buffer.
    pub history_limit: usize,
    /// A repeat scan of the same ticket within this window is flagged.
    pub duplicate_window_ms: u64,
}

impl Default for GateScanConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            duplicate_window_ms: 300_000, // 5 minutes
        }
    }
}

/// One scan event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    /// Local identifier, strictly increasing within a session.
    pub id: u64,
    /// Wall-clock time of the scan, epoch milliseconds.
    pub timestamp: Timestamp,
    /// Verdict for the scanned claim.
    pub result: ValidationResult,
    /// Same ticket was scanned within the duplicate window.
    pub is_duplicate: bool,
    /// Operator-facing warning for duplicates.
    pub warning: Option<String>,
}

impl ScanRecord {
    /// Ticket id the claim named.
    pub fn ticket_id(&self) -> Option<&str> {
        self.result.ticket_id.as_deref()
    }

    /// Whether the claim was accepted.
    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    /// Rejection message for refused claims.
    pub fn error(&self) -> Option<String> {
        self.result.error_message()
    }
}

/// Running tally of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatistics {
    /// Every recorded scan.
    pub total: u64,
    /// Accepted scans.
    pub valid: u64,
    /// Refused scans.
    pub invalid: u64,
    /// Scans flagged as duplicates (valid or not).
    pub duplicate: u64,
}

impl ScanStatistics {
    /// `valid / total * 100` rounded to one decimal; `0` with no scans.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let rate = self.valid as f64 / self.total as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

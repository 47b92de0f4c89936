//! Prometheus metrics for the ticket client.
//!
//! All metrics follow the naming convention: `tl_<subject>_<metric>_total`.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Transactions handed to a signer, by lifecycle operation
    pub static ref TRANSACTIONS_SUBMITTED: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_transactions_submitted_total", "Transactions submitted to the ledger"),
        &["operation"]  // mint/list/grant_seller_badge/purchase/confirm_escrow/refund_escrow
    ).expect("metric creation failed");

    /// Ledger failures after classification
    pub static ref LEDGER_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_ledger_errors_total", "Ledger errors by classified kind"),
        &["kind"]
    ).expect("metric creation failed");

    /// Gate scan verdicts
    pub static ref GATE_SCANS: IntCounterVec = IntCounterVec::new(
        Opts::new("tl_gate_scans_total", "Gate scans by verdict"),
        &["verdict"]  // valid/invalid/duplicate
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRANSACTIONS_SUBMITTED.clone()),
        Box::new(LEDGER_ERRORS.clone()),
        Box::new(GATE_SCANS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_counter_shows_in_exposition() {
        register_metrics().unwrap();
        GATE_SCANS.with_label_values(&["valid"]).inc();
        assert!(GATE_SCANS.with_label_values(&["valid"]).get() >= 1);

        let text = gather_metrics().unwrap();
        assert!(text.contains("tl_gate_scans_total"));
    }
}

//! # TL-05 Gate Scan Session
//!
//! Stateful duplicate detection and running statistics for one venue gate.
//!
//! **Component ID:** 5
//!
//! ```text
//! payload ──→ ClaimVerifier ──→ ValidationResult ──→ record_scan
//!                                                     ├── duplicate check (5 min)
//!                                                     ├── tally update
//!                                                     └── history (newest 50)
//! ```
//!
//! A session is owned by one gate and needs no synchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;

pub use application::GateScanSession;
pub use domain::{GateScanConfig, ScanRecord, ScanStatistics, DUPLICATE_WARNING};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

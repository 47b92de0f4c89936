//! Domain layer for gate scanning.

pub mod entities;

pub use entities::{GateScanConfig, ScanRecord, ScanStatistics, DUPLICATE_WARNING};

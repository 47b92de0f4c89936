//! # TadaaLah Test Suite
//!
//! Flows that cross crate boundaries, run against the in-memory ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/fixtures.rs      # funded marketplace on the in-memory ledger
//! ├── src/integration/
//! │   ├── e2e_lifecycle.rs   # mint → list → purchase → confirm
//! │   ├── error_mapping.rs   # ledger aborts → user-facing errors
//! │   ├── gate_flow.rs       # lifecycle → QR → gate session
//! │   └── identity_flow.rs   # login → derived address → owned ticket
//! └── benches/
//!     └── codec_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tl-tests
//! cargo bench -p tl-tests
//! ```

pub mod fixtures;
pub mod integration;

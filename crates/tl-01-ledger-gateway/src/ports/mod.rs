//! # Ports Module
//!
//! Outbound dependencies of every ledger-facing component.

pub mod outbound;

pub use outbound::*;

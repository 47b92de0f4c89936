//! # Ports Module
//!
//! The lifecycle API offered to callers. Outbound dependencies are the
//! ledger gateway ports of `tl-01`.

pub mod inbound;

pub use inbound::*;

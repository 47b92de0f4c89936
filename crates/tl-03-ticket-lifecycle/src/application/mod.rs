//! # Application Layer
//!
//! Orchestration of lifecycle operations over the ledger gateway.

pub mod service;

pub use service::TicketLifecycleService;

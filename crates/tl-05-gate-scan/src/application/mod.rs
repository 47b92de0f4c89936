//! Application layer for gate scanning.

pub mod session;

pub use session::GateScanSession;

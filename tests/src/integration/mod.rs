//! Cross-crate integration flows.

pub mod e2e_lifecycle;
pub mod error_mapping;
pub mod gate_flow;
pub mod identity_flow;

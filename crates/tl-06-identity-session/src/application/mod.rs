//! Application layer for identity sessions.

pub mod manager;

pub use manager::IdentitySessionManager;

//! Adapters for the identity session ports.

mod file_store;
mod memory_store;
mod salted_digest;

pub use file_store::FileSessionStore;
pub use memory_store::InMemorySessionStore;
pub use salted_digest::SaltedDigestDeriver;

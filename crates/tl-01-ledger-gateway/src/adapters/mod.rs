//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports: a JSON-RPC full-node client and
//! an in-memory ledger used by tests and local demos.

mod in_memory;
mod json_rpc;

pub use in_memory::{InMemoryLedger, InMemoryWallet, GAS_PER_TRANSACTION};
pub use json_rpc::JsonRpcLedgerGateway;

//! # TL-01 Ledger Gateway
//!
//! Thin transport + decode boundary in front of the external ledger.
//!
//! **Component ID:** 1
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! Every other component reads and writes ledger state through this crate:
//! - `read_object` / `read_owned_objects` / `query_objects` for object state
//! - `get_balance` for gas checks
//! - `submit` to hand a `TransactionSpec` to a signer and decode the result
//!
//! The gateway performs no business validation and never retries. Raw RPC
//! JSON is decoded exactly once, here, into `RawObject` and the typed
//! records of `shared-types`; a malformed response surfaces as
//! `GatewayError::Decode` instead of leaking undefined fields upward.
//!
//! ## Module Structure
//!
//! ```text
//! tl-01-ledger-gateway/
//! ├── domain/     # RawObject, TransactionSpec, decoders, GatewayError
//! ├── ports/      # LedgerGateway + TransactionSigner traits
//! └── adapters/   # JSON-RPC full-node adapter, in-memory ledger double
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{InMemoryLedger, InMemoryWallet, JsonRpcLedgerGateway, GAS_PER_TRANSACTION};
pub use domain::{
    decode_escrow, decode_listing, decode_seller_profile, decode_ticket,
    decode_transaction_response, CallArg, Command, GatewayError, MoveCall, ObjectOwner, PureArg,
    RawObject, TransactionBuilder, TransactionSpec, DEFAULT_GAS_BUDGET,
};
pub use ports::{LedgerGateway, TransactionSigner};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

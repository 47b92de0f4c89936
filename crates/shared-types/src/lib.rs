//! # Shared Types Crate
//!
//! Ledger records, identifiers and configuration used by every component of
//! the ticket client.
//!
//! ## Design Principles
//!
//! - **Ledger owns the objects**: `Ticket`, `Listing`, `SellerProfile` and
//!   `Escrow` are read-only snapshots. The client never mutates them; it
//!   submits transitions and re-reads.
//! - **Typed at the boundary**: these records are produced once by the ledger
//!   gateway decoders. Nothing above the gateway touches raw RPC JSON.
//! - **Explicit configuration**: network, package and admin identifiers come
//!   from `MarketplaceConfig`, never from module constants.

pub mod config;
pub mod entities;
pub mod errors;
pub mod time;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use time::*;

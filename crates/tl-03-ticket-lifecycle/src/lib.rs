//! # TL-03 Ticket Lifecycle Engine
//!
//! Drives tickets through the marketplace state machine and translates
//! ledger failures into a user-facing taxonomy.
//!
//! **Component ID:** 3
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## State Machine
//!
//! ```text
//! Unminted ──mint──→ Minted(creator) ──list──→ Listed
//!                                                │
//!                                            purchase (custody → buyer)
//!                                                ↓
//!                                        Escrowed(Pending)
//!                                         │             │
//!                            confirm (buyer)       refund (admin cap)
//!                                         ↓             ↓
//!                                     Released      Refunded
//! ```
//!
//! A refund moves the payment back to the buyer and leaves the ticket with
//! the buyer. Escrow states `Released` and `Refunded` are terminal.
//!
//! ## Error Policy
//!
//! - Input is validated before any request is built (`LifecycleError::Validation`).
//! - Ledger failures are classified by message substring into `LedgerError`;
//!   unmatched ones become `RemoteFailure` with the original message.
//! - Nothing is retried.
//!
//! ## Module Structure
//!
//! ```text
//! tl-03-ticket-lifecycle/
//! ├── domain/
//! │   ├── entities.rs    # EnrichedListing, Purchase, BalanceReport
//! │   ├── errors.rs      # LifecycleError, LedgerError
//! │   └── invariants.rs  # Input checks and settlement post-conditions
//! ├── ports/
//! │   └── inbound.rs     # TicketLifecycleApi
//! └── application/
//!     └── service.rs     # TicketLifecycleService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::TicketLifecycleService;
pub use domain::{BalanceReport, EnrichedListing, LedgerError, LifecycleError, Purchase};
pub use ports::TicketLifecycleApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

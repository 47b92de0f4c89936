//! TL-Admin: TadaaLah operator CLI
//!
//! Read-only tooling for venue staff and operators. It holds no signer, so
//! every ledger-facing command is a lookup; the `gate` command runs a
//! scan session over payloads read from stdin (one per line, as a USB
//! barcode scanner types them).
//!
//! ```text
//! tl-admin [--config FILE] [--network NET] [--rpc-url URL] <command>
//!
//!   convert to-smallest 1.5       1500000000
//!   convert to-display 1500000000 1.5000
//!   qr encode <ticket-id>         payload + data URL
//!   qr validate <payload>         verdict
//!   gate                          scan loop on stdin
//!   ticket | escrow <id>
//!   listings | purchases <addr> | balance <addr>
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

pub use cli::{Args, Command};
pub use commands::run;
pub use config::load_config;

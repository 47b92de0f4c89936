//! # TL-02 Money/ID Codec
//!
//! Pure conversions between the ledger's integer smallest unit and the
//! display currency, and extraction of created-object ids from
//! transaction results.
//!
//! ## Module Structure
//!
//! ```text
//! tl-02-money-codec/
//! ├── domain/
//! │   ├── amount.rs      # to_smallest_unit / to_display_unit
//! │   └── created_id.rs  # extract_created_id
//! └── error.rs           # CodecError
//! ```
//!
//! ## Invariants
//!
//! - Display → smallest truncates at nine decimals, never rounds up.
//! - `to_smallest(to_display(to_smallest(x)))` is a fixed point.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod error;

pub use domain::{
    extract_created_id, parse_display_amount, parse_smallest_unit, to_display_unit,
    to_display_unit_str, to_smallest_unit, DISPLAY_DECIMALS, SMALLEST_UNITS_PER_DISPLAY,
};
pub use error::CodecError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

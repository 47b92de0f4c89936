//! # Domain Module
//!
//! Gateway-level types: raw objects, transaction specs, decoders, errors.

pub mod decode;
pub mod errors;
pub mod raw;
pub mod transaction;

pub use decode::*;
pub use errors::*;
pub use raw::*;
pub use transaction::*;

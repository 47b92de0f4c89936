//! # Domain Layer
//!
//! Error taxonomy, input invariants and joined read models.

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
pub use invariants::*;

//! Pure conversion functions.

pub mod amount;
pub mod created_id;

pub use amount::*;
pub use created_id::*;

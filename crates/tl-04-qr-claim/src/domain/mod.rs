//! Domain layer for the QR claim codec.

pub mod claim;
pub mod render;
pub mod verdict;

pub use claim::{decode_claim, QrClaim};
pub use render::{render_svg, svg_data_url, QR_MIN_SIZE};
pub use verdict::{ClaimOutcome, ClaimRejection, ValidationResult};

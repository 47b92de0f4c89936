//! # Domain Invariants
//!
//! Input checks run before any request leaves the process, and the
//! post-conditions checked on re-read state.

use super::errors::{LedgerError, LifecycleError};
use shared_types::{Escrow, EscrowStatus, ObjectId};

/// Every string must be non-empty after trimming.
pub fn require_non_blank(values: &[&str], message: &str) -> Result<(), LifecycleError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(LifecycleError::validation(message));
    }
    Ok(())
}

/// Amounts and prices must be strictly positive.
pub fn require_positive(amount: u64, message: &str) -> Result<(), LifecycleError> {
    if amount == 0 {
        return Err(LifecycleError::validation(message));
    }
    Ok(())
}

/// After a settlement transaction the escrow must be in `expected`.
pub fn require_settled(escrow: &Escrow, expected: EscrowStatus) -> Result<(), LifecycleError> {
    if escrow.status != expected {
        return Err(LedgerError::RemoteFailure(format!(
            "escrow {} is {} after settlement, expected {}",
            escrow.id, escrow.status, expected
        ))
        .into());
    }
    Ok(())
}

/// A created object must be readable right after creation.
pub fn require_present<T>(
    value: Option<T>,
    kind: &str,
    id: &ObjectId,
) -> Result<T, LifecycleError> {
    value.ok_or_else(|| {
        LedgerError::RemoteFailure(format!("created {} {} could not be read back", kind, id)).into()
    })
}

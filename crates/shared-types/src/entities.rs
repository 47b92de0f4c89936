//! # Ledger Entities
//!
//! Typed snapshots of the marketplace objects held by the ledger.
//!
//! ## Object Graph
//!
//! ```text
//! SellerProfile ──authorizes──→ Listing ──references──→ Ticket
//!                                  │
//!                               purchase
//!                                  ↓
//!                               Escrow { Pending → Released | Refunded }
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque ledger object identifier (e.g. `0x5f3a...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap an identifier as returned by the ledger.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ObjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ledger account address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the address is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// TICKET
// =============================================================================

/// A single event-entry right.
///
/// Immutable after mint except for ownership transfer on purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ledger-assigned object id.
    pub id: ObjectId,
    /// Human readable event name.
    pub event_name: String,
    /// Event date as entered at mint time.
    pub event_date: String,
    /// Content-addressed reference (CID) of the stored ticket artifact.
    pub artifact_ref: String,
    /// Whether the original issuer vouched for this ticket.
    pub original_issuer_verified: bool,
    /// Current owner, `None` for shared or wrapped objects.
    pub owner: Option<Address>,
}

impl Ticket {
    /// Parse `event_date` as RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`.
    pub fn event_date_parsed(&self) -> Option<DateTime<Utc>> {
        let raw = self.event_date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
            return Some(Utc.from_utc_datetime(&naive));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Event falls on the same calendar day as `now`.
    pub fn is_event_today(&self, now: DateTime<Utc>) -> bool {
        self.event_date_parsed()
            .map(|date| date.date_naive() == now.date_naive())
            .unwrap_or(false)
    }

    /// Event starts within the next 24 hours.
    pub fn is_event_soon(&self, now: DateTime<Utc>) -> bool {
        match self.event_date_parsed() {
            Some(date) => {
                let until = date - now;
                until > Duration::zero() && until <= Duration::hours(24)
            }
            None => false,
        }
    }

    /// True when `address` currently owns the ticket.
    pub fn is_owned_by(&self, address: &Address) -> bool {
        self.owner.as_ref() == Some(address)
    }
}

// =============================================================================
// SELLER PROFILE & LISTING
// =============================================================================

/// A seller's verified-badge credential. At most one per seller address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProfile {
    /// Ledger-assigned object id.
    pub id: ObjectId,
    /// Seller the badge was granted to.
    pub seller_address: Address,
    /// Badge flag checked by the ledger on listing.
    pub verified_badge: bool,
}

/// An open offer to sell a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Ledger-assigned object id.
    pub id: ObjectId,
    /// Ticket being sold. Must resolve to an existing Ticket.
    pub ticket_id: ObjectId,
    /// Seller address.
    pub seller_address: Address,
    /// Asking price in smallest currency units.
    pub price: u64,
}

// =============================================================================
// ESCROW
// =============================================================================

/// Escrow settlement state.
///
/// ```text
/// [Pending] ──confirm (buyer)──→ [Released]
///     │
///     └──── refund (admin cap) ──→ [Refunded]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowStatus {
    /// Funds held, awaiting buyer confirmation or refund.
    Pending,
    /// Funds released to the seller. Terminal.
    Released,
    /// Funds returned to the buyer. Terminal.
    Refunded,
}

impl EscrowStatus {
    /// On-ledger status code.
    pub fn code(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Released => 1,
            Self::Refunded => 2,
        }
    }

    /// Decode an on-ledger status code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Released),
            2 => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Decode a textual status (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "released" => Some(Self::Released),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Only `Pending → Released` and `Pending → Refunded` are permitted.
    pub fn can_transition_to(self, next: EscrowStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Released) | (Self::Pending, Self::Refunded)
        )
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Released => "Released",
            Self::Refunded => "Refunded",
        };
        f.write_str(name)
    }
}

/// Funds held pending buyer confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escrow {
    /// Ledger-assigned object id.
    pub id: ObjectId,
    /// Seller to be paid on release.
    pub seller: Address,
    /// Buyer, the only party allowed to confirm.
    pub buyer: Address,
    /// Ticket the payment is for.
    pub ticket_id: ObjectId,
    /// Settlement state.
    pub status: EscrowStatus,
    /// Held amount in smallest currency units.
    pub amount: u64,
}

// =============================================================================
// TRANSACTION RESULTS
// =============================================================================

/// An object created by an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    /// Id of the new object.
    pub object_id: ObjectId,
    /// Fully qualified struct type, when the ledger reports it.
    pub object_type: Option<String>,
    /// Owner after execution, when address-owned.
    pub owner: Option<Address>,
}

/// Decoded result of a successfully executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransactionResult {
    /// Transaction digest.
    pub digest: String,
    /// Objects created, in the order the ledger reported them.
    pub created: Vec<CreatedObject>,
}

//! # Read Models
//!
//! Joined views assembled from several ledger objects.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Escrow, Listing, Network, Ticket};

/// A listing with its ticket resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedListing {
    /// The open offer.
    pub listing: Listing,
    /// The ticket it sells.
    pub ticket: Ticket,
}

/// A ticket held by a user, with the escrow of its purchase if one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// The owned ticket.
    pub ticket: Ticket,
    /// Escrow where the user is buyer and the ticket matches.
    pub escrow: Option<Escrow>,
}

/// Gas balance of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Queried account.
    pub address: Address,
    /// Balance in smallest units.
    pub balance: u64,
    /// Balance in display units, four decimals.
    pub display: String,
    /// Network the balance was read on.
    pub network: Network,
    /// Below the configured threshold on a test network.
    pub low_balance: bool,
}

//! # Inbound Ports
//!
//! API trait defining what the lifecycle engine can do.

use crate::domain::{BalanceReport, EnrichedListing, LifecycleError, Purchase};
use async_trait::async_trait;
use shared_types::{Address, Escrow, Listing, ObjectId, SellerProfile, Ticket};
use tl_01_ledger_gateway::TransactionSigner;

/// Ticket lifecycle - inbound port.
///
/// Write operations validate input locally, submit one transaction through
/// the signer, then re-read the resulting object. None of them retry or
/// deduplicate.
#[async_trait]
pub trait TicketLifecycleApi: Send + Sync {
    /// Mint a ticket owned by the signer.
    async fn mint(
        &self,
        event_name: &str,
        event_date: &str,
        artifact_ref: &str,
        signer: &dyn TransactionSigner,
    ) -> Result<Ticket, LifecycleError>;

    /// List an owned ticket at `price` smallest units.
    async fn list(
        &self,
        ticket_id: &ObjectId,
        seller_profile_id: &ObjectId,
        price: u64,
        signer: &dyn TransactionSigner,
    ) -> Result<Listing, LifecycleError>;

    /// Grant a verified seller profile. The signer must be the admin.
    async fn grant_seller_badge(
        &self,
        admin_address: &Address,
        seller_address: &Address,
        signer: &dyn TransactionSigner,
    ) -> Result<SellerProfile, LifecycleError>;

    /// Buy a listed ticket. Payment is held in a new `Pending` escrow.
    async fn purchase(
        &self,
        listing_id: &ObjectId,
        ticket_id: &ObjectId,
        payment_amount: u64,
        signer: &dyn TransactionSigner,
    ) -> Result<Escrow, LifecycleError>;

    /// Release escrowed funds to the seller. Buyer only.
    async fn confirm_escrow(
        &self,
        escrow_id: &ObjectId,
        signer: &dyn TransactionSigner,
    ) -> Result<Escrow, LifecycleError>;

    /// Return escrowed funds to the buyer. Admin capability only.
    async fn refund_escrow(
        &self,
        escrow_id: &ObjectId,
        admin_signer: &dyn TransactionSigner,
    ) -> Result<Escrow, LifecycleError>;

    /// Read a ticket. `None` if absent.
    async fn fetch_ticket(&self, ticket_id: &ObjectId) -> Result<Option<Ticket>, LifecycleError>;

    /// Read an escrow. `None` if absent.
    async fn fetch_escrow(&self, escrow_id: &ObjectId) -> Result<Option<Escrow>, LifecycleError>;

    /// Seller profile owned by `owner`, if any.
    async fn fetch_seller_profile(
        &self,
        owner: &Address,
    ) -> Result<Option<SellerProfile>, LifecycleError>;

    /// Every open listing whose ticket can be read.
    async fn fetch_active_listings(&self) -> Result<Vec<EnrichedListing>, LifecycleError>;

    /// Open listings owned by `owner`.
    async fn fetch_user_listings(
        &self,
        owner: &Address,
    ) -> Result<Vec<EnrichedListing>, LifecycleError>;

    /// Tickets owned by `owner`, joined with their purchase escrow.
    async fn fetch_user_purchases(&self, owner: &Address) -> Result<Vec<Purchase>, LifecycleError>;

    /// Gas balance with a low-balance flag.
    async fn check_balance(&self, address: &Address) -> Result<BalanceReport, LifecycleError>;
}

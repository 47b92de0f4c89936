//! # Ticket Lifecycle Service
//!
//! Application service driving tickets through
//! `Minted → Listed → Escrowed(Pending) → Released | Refunded`.
//!
//! The service holds no locks and keeps no state between calls: the ledger
//! is the source of truth and its own version checks reject conflicting
//! transitions.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use shared_types::{
    Address, Escrow, EscrowStatus, Listing, MarketplaceConfig, ObjectId, ObjectTypes,
    SellerProfile, Ticket, TransactionResult,
};
use tl_01_ledger_gateway::{
    decode_escrow, decode_listing, decode_seller_profile, decode_ticket, CallArg, GatewayError,
    LedgerGateway, RawObject, TransactionBuilder, TransactionSigner, TransactionSpec,
};
use tl_02_money_codec::{extract_created_id, to_display_unit};
use tl_telemetry::{metric_inc, LEDGER_ERRORS, TRANSACTIONS_SUBMITTED};

use crate::domain::{
    require_non_blank, require_positive, require_present, require_settled, BalanceReport,
    EnrichedListing, LedgerError, LifecycleError, Purchase,
};
use crate::ports::TicketLifecycleApi;

const TICKET_MODULE: &str = "ticket";
const ESCROW_MODULE: &str = "ticket_escrow";

/// Ticket Lifecycle Service - orchestrates ledger transitions.
pub struct TicketLifecycleService<G: LedgerGateway> {
    /// Ledger access.
    gateway: Arc<G>,
    /// Deployment configuration.
    config: MarketplaceConfig,
    /// Struct types derived from the package id.
    types: ObjectTypes,
}

impl<G: LedgerGateway> TicketLifecycleService<G> {
    /// Create a service for the deployment described by `config`.
    pub fn new(gateway: Arc<G>, config: MarketplaceConfig) -> Self {
        let types = config.object_types();
        Self {
            gateway,
            config,
            types,
        }
    }

    /// Deployment configuration.
    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    /// Underlying gateway.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Internal: sign, execute, count and log one transaction.
    async fn execute(
        &self,
        operation: &'static str,
        tx: TransactionSpec,
        signer: &dyn TransactionSigner,
    ) -> Result<TransactionResult, LifecycleError> {
        metric_inc!(TRANSACTIONS_SUBMITTED, &[operation]);

        match self.gateway.submit(&tx, signer).await {
            Ok(result) => {
                info!(
                    "[tl-03] {} succeeded: {}",
                    operation,
                    self.config.network.explorer_tx_url(&result.digest)
                );
                Ok(result)
            }
            Err(e) => {
                let classified = LedgerError::from(e);
                metric_inc!(LEDGER_ERRORS, &[classified.kind()]);
                error!(
                    "[tl-03] {} failed on {}: {}",
                    operation, self.config.network, classified
                );
                if classified == LedgerError::InsufficientGas
                    && self.config.network.is_test_network()
                {
                    for faucet in self.config.network.faucets() {
                        warn!("[tl-03] Get test funds from {}", faucet);
                    }
                }
                Err(classified.into())
            }
        }
    }

    /// Internal: read and decode an object of `expected_type`, treating any
    /// other type (another package's included) as absent.
    async fn read_typed<T, F>(
        &self,
        id: &ObjectId,
        expected_type: &str,
        decode: F,
    ) -> Result<Option<T>, LifecycleError>
    where
        F: Fn(&RawObject) -> Result<T, GatewayError>,
    {
        match self.gateway.read_object(id).await? {
            None => Ok(None),
            Some(raw) => match raw.require_type(expected_type).and_then(|()| decode(&raw)) {
                Ok(value) => Ok(Some(value)),
                Err(GatewayError::UnexpectedType { .. }) => Ok(None),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Internal: resolve tickets for listings, dropping the unreadable ones.
    async fn enrich(&self, raws: Vec<RawObject>) -> Vec<EnrichedListing> {
        let mut enriched = Vec::with_capacity(raws.len());
        for raw in raws {
            let listing = match decode_listing(&raw) {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("[tl-03] Skipping undecodable listing {}: {}", raw.object_id, e);
                    continue;
                }
            };
            let ticket = self
                .read_typed(&listing.ticket_id, &self.types.ticket, decode_ticket)
                .await;
            match ticket {
                Ok(Some(ticket)) => enriched.push(EnrichedListing { listing, ticket }),
                Ok(None) => warn!(
                    "[tl-03] Listing {} references missing ticket {}",
                    listing.id, listing.ticket_id
                ),
                Err(e) => warn!(
                    "[tl-03] Failed to fetch ticket {} for listing {}: {}",
                    listing.ticket_id, listing.id, e
                ),
            }
        }
        enriched
    }

    fn require_address(owner: &Address) -> Result<(), LifecycleError> {
        require_non_blank(&[owner.as_str()], "User address is required")
    }
}

#[async_trait]
impl<G: LedgerGateway + 'static> TicketLifecycleApi for TicketLifecycleService<G> {
    async fn mint(
        &self,
        event_name: &str,
        event_date: &str,
        artifact_ref: &str,
        signer: &dyn TransactionSigner,
    ) -> Result<Ticket, LifecycleError> {
        require_non_blank(
            &[event_name, event_date, artifact_ref],
            "All ticket details are required",
        )?;

        let recipient = signer.address();
        let mut tx = TransactionBuilder::new("mint");
        let ticket = tx.move_call(
            &self.config.package_id,
            TICKET_MODULE,
            "mint_ticket",
            vec![
                CallArg::string(event_name.trim()),
                CallArg::string(event_date.trim()),
                CallArg::string(artifact_ref.trim()),
            ],
        );
        tx.transfer_objects(vec![ticket], recipient.clone());

        let result = self.execute("mint", tx.build(), signer).await?;
        let ticket_id = extract_created_id(&result, Some(&self.types.ticket))?;
        let ticket = require_present(self.fetch_ticket(&ticket_id).await?, "ticket", &ticket_id)?;
        info!(
            "[tl-03] Minted ticket {} '{}' for {}",
            ticket.id, ticket.event_name, recipient
        );
        Ok(ticket)
    }

    async fn list(
        &self,
        ticket_id: &ObjectId,
        seller_profile_id: &ObjectId,
        price: u64,
        signer: &dyn TransactionSigner,
    ) -> Result<Listing, LifecycleError> {
        const MESSAGE: &str = "Valid ticket ID, seller profile, and price are required";
        require_non_blank(&[ticket_id.as_str(), seller_profile_id.as_str()], MESSAGE)?;
        require_positive(price, MESSAGE)?;

        let mut tx = TransactionBuilder::new("list");
        let listing = tx.move_call(
            &self.config.package_id,
            TICKET_MODULE,
            "list_ticket",
            vec![
                CallArg::object(ticket_id.clone()),
                CallArg::object(seller_profile_id.clone()),
                CallArg::u64(price),
            ],
        );
        tx.transfer_objects(vec![listing], signer.address());

        let result = self.execute("list", tx.build(), signer).await?;
        let listing_id = extract_created_id(&result, Some(&self.types.listing))?;
        let listing = require_present(
            self.read_typed(&listing_id, &self.types.listing, decode_listing).await?,
            "listing",
            &listing_id,
        )?;
        info!(
            "[tl-03] Listed ticket {} as {} at {}",
            listing.ticket_id,
            listing.id,
            to_display_unit(listing.price)
        );
        Ok(listing)
    }

    async fn grant_seller_badge(
        &self,
        admin_address: &Address,
        seller_address: &Address,
        signer: &dyn TransactionSigner,
    ) -> Result<SellerProfile, LifecycleError> {
        require_non_blank(&[seller_address.as_str()], "Seller address is required")?;
        require_non_blank(&[admin_address.as_str()], "Admin address is required")?;

        let mut tx = TransactionBuilder::new("grant_seller_badge");
        let profile = tx.move_call(
            &self.config.package_id,
            TICKET_MODULE,
            "grant_seller_badge",
            vec![
                CallArg::address(admin_address.clone()),
                CallArg::address(seller_address.clone()),
            ],
        );
        tx.transfer_objects(vec![profile], seller_address.clone());

        let result = self.execute("grant_seller_badge", tx.build(), signer).await?;
        let profile_id = extract_created_id(&result, Some(&self.types.seller_profile))?;
        let profile = require_present(
            self.read_typed(&profile_id, &self.types.seller_profile, decode_seller_profile)
                .await?,
            "seller profile",
            &profile_id,
        )?;
        info!(
            "[tl-03] Granted seller badge {} to {}",
            profile.id, profile.seller_address
        );
        Ok(profile)
    }

    async fn purchase(
        &self,
        listing_id: &ObjectId,
        ticket_id: &ObjectId,
        payment_amount: u64,
        signer: &dyn TransactionSigner,
    ) -> Result<Escrow, LifecycleError> {
        const MESSAGE: &str = "Valid listing ID, ticket ID, and payment amount are required";
        require_non_blank(&[listing_id.as_str(), ticket_id.as_str()], MESSAGE)?;
        require_positive(payment_amount, MESSAGE)?;

        let mut tx = TransactionBuilder::new("purchase");
        let payment = tx.split_gas(payment_amount);
        tx.move_call(
            &self.config.package_id,
            TICKET_MODULE,
            "purchase_ticket",
            vec![
                CallArg::object(listing_id.clone()),
                CallArg::object(ticket_id.clone()),
                CallArg::Result(payment),
            ],
        );

        let result = self.execute("purchase", tx.build(), signer).await?;
        let escrow_id = extract_created_id(&result, Some(&self.types.escrow))?;
        let escrow = require_present(self.fetch_escrow(&escrow_id).await?, "escrow", &escrow_id)?;
        info!(
            "[tl-03] Purchased ticket {} into escrow {} ({})",
            escrow.ticket_id, escrow.id, escrow.status
        );
        Ok(escrow)
    }

    async fn confirm_escrow(
        &self,
        escrow_id: &ObjectId,
        signer: &dyn TransactionSigner,
    ) -> Result<Escrow, LifecycleError> {
        require_non_blank(&[escrow_id.as_str()], "Escrow ID is required")?;

        let mut tx = TransactionBuilder::new("confirm_escrow");
        tx.move_call(
            &self.config.package_id,
            ESCROW_MODULE,
            "confirm_and_release",
            vec![CallArg::object(escrow_id.clone())],
        );

        self.execute("confirm_escrow", tx.build(), signer).await?;
        let escrow = require_present(self.fetch_escrow(escrow_id).await?, "escrow", escrow_id)?;
        require_settled(&escrow, EscrowStatus::Released)?;
        info!("[tl-03] Escrow {} released to {}", escrow.id, escrow.seller);
        Ok(escrow)
    }

    async fn refund_escrow(
        &self,
        escrow_id: &ObjectId,
        admin_signer: &dyn TransactionSigner,
    ) -> Result<Escrow, LifecycleError> {
        require_non_blank(&[escrow_id.as_str()], "Escrow ID is required")?;

        let mut tx = TransactionBuilder::new("refund_escrow");
        tx.move_call(
            &self.config.package_id,
            ESCROW_MODULE,
            "refund",
            vec![
                CallArg::object(escrow_id.clone()),
                CallArg::object(self.config.escrow_admin_cap_id.clone()),
            ],
        );

        self.execute("refund_escrow", tx.build(), admin_signer).await?;
        let escrow = require_present(self.fetch_escrow(escrow_id).await?, "escrow", escrow_id)?;
        require_settled(&escrow, EscrowStatus::Refunded)?;
        // Ticket custody stays with the buyer; only the payment moves back.
        info!("[tl-03] Escrow {} refunded to {}", escrow.id, escrow.buyer);
        Ok(escrow)
    }

    async fn fetch_ticket(&self, ticket_id: &ObjectId) -> Result<Option<Ticket>, LifecycleError> {
        require_non_blank(&[ticket_id.as_str()], "Ticket ID is required")?;
        self.read_typed(ticket_id, &self.types.ticket, decode_ticket).await
    }

    async fn fetch_escrow(&self, escrow_id: &ObjectId) -> Result<Option<Escrow>, LifecycleError> {
        require_non_blank(&[escrow_id.as_str()], "Escrow ID is required")?;
        self.read_typed(escrow_id, &self.types.escrow, decode_escrow).await
    }

    async fn fetch_seller_profile(
        &self,
        owner: &Address,
    ) -> Result<Option<SellerProfile>, LifecycleError> {
        Self::require_address(owner)?;
        let raws = self
            .gateway
            .read_owned_objects(owner, &self.types.seller_profile)
            .await?;
        raws.first()
            .map(decode_seller_profile)
            .transpose()
            .map_err(LifecycleError::from)
    }

    async fn fetch_active_listings(&self) -> Result<Vec<EnrichedListing>, LifecycleError> {
        let raws = self.gateway.query_objects(&self.types.listing).await?;
        let total = raws.len();
        let listings = self.enrich(raws).await;
        info!(
            "[tl-03] {} active listings ({} dropped)",
            listings.len(),
            total - listings.len()
        );
        Ok(listings)
    }

    async fn fetch_user_listings(
        &self,
        owner: &Address,
    ) -> Result<Vec<EnrichedListing>, LifecycleError> {
        Self::require_address(owner)?;
        let raws = self
            .gateway
            .read_owned_objects(owner, &self.types.listing)
            .await?;
        Ok(self.enrich(raws).await)
    }

    async fn fetch_user_purchases(&self, owner: &Address) -> Result<Vec<Purchase>, LifecycleError> {
        Self::require_address(owner)?;
        let tickets = self
            .gateway
            .read_owned_objects(owner, &self.types.ticket)
            .await?;
        let escrows: Vec<Escrow> = self
            .gateway
            .query_objects(&self.types.escrow)
            .await?
            .iter()
            .filter_map(|raw| match decode_escrow(raw) {
                Ok(escrow) => Some(escrow),
                Err(e) => {
                    warn!("[tl-03] Skipping undecodable escrow {}: {}", raw.object_id, e);
                    None
                }
            })
            .filter(|escrow| &escrow.buyer == owner)
            .collect();

        let mut purchases = Vec::with_capacity(tickets.len());
        for raw in &tickets {
            let ticket = decode_ticket(raw)?;
            let escrow = escrows
                .iter()
                .find(|escrow| escrow.ticket_id == ticket.id)
                .cloned();
            purchases.push(Purchase { ticket, escrow });
        }
        info!("[tl-03] Found {} purchases for {}", purchases.len(), owner);
        Ok(purchases)
    }

    async fn check_balance(&self, address: &Address) -> Result<BalanceReport, LifecycleError> {
        Self::require_address(address)?;
        let balance = self.gateway.get_balance(address).await?;
        let network = self.config.network;
        let low_balance =
            network.is_test_network() && balance < self.config.low_balance_threshold;
        if low_balance {
            warn!(
                "[tl-03] Low {} balance for {}: {}",
                network,
                address,
                to_display_unit(balance)
            );
            for faucet in network.faucets() {
                warn!("[tl-03] Get test funds from {}", faucet);
            }
        }
        Ok(BalanceReport {
            address: address.clone(),
            balance,
            display: to_display_unit(balance),
            network,
            low_balance,
        })
    }
}

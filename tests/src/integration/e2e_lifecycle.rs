//! # Ticket Lifecycle End-to-End
//!
//! ```text
//! admin ──grant──→ seller ──mint──→ ticket ──list──→ listing
//!                                                      │
//!                      buyer ──purchase──→ escrow (Pending)
//!                                            │
//!                      buyer ──confirm──→ escrow (Released) ──→ seller paid
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::{Marketplace, ONE};
    use shared_types::EscrowStatus;
    use tl_01_ledger_gateway::{TransactionSigner, GAS_PER_TRANSACTION};
    use tl_02_money_codec::{parse_display_amount, to_display_unit, to_smallest_unit};
    use tl_03_ticket_lifecycle::{LedgerError, TicketLifecycleApi};

    // =========================================================================
    // FULL SALE
    // =========================================================================

    #[tokio::test]
    async fn test_mint_list_purchase_confirm() {
        let m = Marketplace::new();
        let seller = m.seller.address();
        let buyer = m.buyer.address();

        let profile = m
            .lifecycle
            .grant_seller_badge(&m.admin.address(), &seller, &m.admin)
            .await
            .unwrap();
        assert!(profile.verified_badge);
        assert_eq!(profile.seller_address, seller);

        let ticket = m
            .lifecycle
            .mint("Concert", "2025-12-01", "cidABC", &m.seller)
            .await
            .unwrap();
        assert_eq!(ticket.event_name, "Concert");
        assert_eq!(ticket.event_date, "2025-12-01");
        assert_eq!(ticket.artifact_ref, "cidABC");
        assert_eq!(ticket.owner, Some(seller.clone()));

        let price = parse_display_amount("1.5").unwrap();
        assert_eq!(price, 1_500_000_000);
        assert_eq!(to_smallest_unit(1.5).unwrap(), price);
        let listing = m
            .lifecycle
            .list(&ticket.id, &profile.id, price, &m.seller)
            .await
            .unwrap();
        assert_eq!(listing.ticket_id, ticket.id);
        assert_eq!(listing.price, price);

        let active = m.lifecycle.fetch_active_listings().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].ticket.event_name, "Concert");

        let escrow = m
            .lifecycle
            .purchase(&listing.id, &ticket.id, price, &m.buyer)
            .await
            .unwrap();
        assert_eq!(escrow.status, EscrowStatus::Pending);
        assert_eq!(escrow.amount, price);
        assert_eq!(escrow.buyer, buyer);
        assert_eq!(escrow.seller, seller);

        let held = m.lifecycle.fetch_ticket(&ticket.id).await.unwrap().unwrap();
        assert_eq!(held.owner, Some(buyer.clone()));
        assert!(m.lifecycle.fetch_active_listings().await.unwrap().is_empty());

        let purchases = m.lifecycle.fetch_user_purchases(&buyer).await.unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(
            purchases[0].escrow.as_ref().map(|e| e.status),
            Some(EscrowStatus::Pending)
        );

        let seller_before = m.ledger.balance(&seller);
        let released = m.lifecycle.confirm_escrow(&escrow.id, &m.buyer).await.unwrap();
        assert_eq!(released.status, EscrowStatus::Released);
        assert_eq!(m.ledger.balance(&seller), seller_before + price);
        assert_eq!(
            m.ledger.balance(&buyer),
            10 * ONE - price - 2 * GAS_PER_TRANSACTION
        );

        // Settled escrows stay settled.
        let again = m
            .lifecycle
            .confirm_escrow(&escrow.id, &m.buyer)
            .await
            .unwrap_err();
        assert_eq!(again.ledger(), Some(&LedgerError::EscrowNotPending));
        let refund = m
            .lifecycle
            .refund_escrow(&escrow.id, &m.admin)
            .await
            .unwrap_err();
        assert_eq!(refund.ledger(), Some(&LedgerError::EscrowNotPending));
    }

    // =========================================================================
    // DISPUTE
    // =========================================================================

    #[tokio::test]
    async fn test_admin_refund_returns_payment() {
        let m = Marketplace::new();
        let profile = m
            .lifecycle
            .grant_seller_badge(&m.admin.address(), &m.seller.address(), &m.admin)
            .await
            .unwrap();
        let ticket = m
            .lifecycle
            .mint("Theatre", "2026-01-10", "cidXYZ", &m.seller)
            .await
            .unwrap();
        let listing = m
            .lifecycle
            .list(&ticket.id, &profile.id, 2 * ONE, &m.seller)
            .await
            .unwrap();
        let escrow = m
            .lifecycle
            .purchase(&listing.id, &ticket.id, 2 * ONE, &m.buyer)
            .await
            .unwrap();

        let refunded = m.lifecycle.refund_escrow(&escrow.id, &m.admin).await.unwrap();
        assert_eq!(refunded.status, EscrowStatus::Refunded);
        assert_eq!(
            m.ledger.balance(&m.buyer.address()),
            10 * ONE - GAS_PER_TRANSACTION
        );

        let report = m.lifecycle.check_balance(&m.buyer.address()).await.unwrap();
        assert_eq!(report.display, to_display_unit(10 * ONE - GAS_PER_TRANSACTION));
        assert!(!report.low_balance);

        let confirm = m
            .lifecycle
            .confirm_escrow(&escrow.id, &m.buyer)
            .await
            .unwrap_err();
        assert_eq!(confirm.ledger(), Some(&LedgerError::EscrowNotPending));
    }
}

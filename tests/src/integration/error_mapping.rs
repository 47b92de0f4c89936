//! Ledger failures as users see them.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Marketplace, ONE};
    use shared_types::Address;
    use tl_01_ledger_gateway::{InMemoryWallet, TransactionSigner};
    use tl_03_ticket_lifecycle::{LedgerError, LifecycleError, TicketLifecycleApi};

    #[tokio::test]
    async fn test_user_facing_messages() {
        let m = Marketplace::new();

        let err = m
            .lifecycle
            .grant_seller_badge(&m.seller.address(), &m.seller.address(), &m.seller)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Admin capability required for this operation");

        let broke = InMemoryWallet::new(m.ledger.clone(), Address::new("0xbroke"));
        let ticket = m
            .lifecycle
            .mint("Concert", "2025-12-01", "cidABC", &m.seller)
            .await
            .unwrap();
        let profile = m
            .lifecycle
            .grant_seller_badge(&m.admin.address(), &m.seller.address(), &m.admin)
            .await
            .unwrap();
        let listing = m
            .lifecycle
            .list(&ticket.id, &profile.id, 100 * ONE, &m.seller)
            .await
            .unwrap();
        let err = m
            .lifecycle
            .purchase(&listing.id, &ticket.id, 100 * ONE, &m.buyer)
            .await
            .unwrap_err();
        assert_eq!(err.ledger(), Some(&LedgerError::InsufficientGas));
        assert_eq!(err.to_string(), "Insufficient balance for gas fees");

        let err = m
            .lifecycle
            .mint("Concert", "2025-12-01", "cidABC", &broke)
            .await
            .unwrap_err();
        assert_eq!(err.ledger(), Some(&LedgerError::InsufficientGas));
    }

    #[tokio::test]
    async fn test_rejected_signature_and_validation() {
        let m = Marketplace::new();
        m.seller.reject_signing(true);
        let err = m
            .lifecycle
            .mint("Concert", "2025-12-01", "cidABC", &m.seller)
            .await
            .unwrap_err();
        assert_eq!(err.ledger(), Some(&LedgerError::InvalidSignature));

        let err = m
            .lifecycle
            .mint("", "2025-12-01", "cidABC", &m.buyer)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::Validation("All ticket details are required".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_abort_keeps_message() {
        let err = LedgerError::classify("MoveAbort in module 0x9::other: code 77");
        assert_eq!(err.kind(), "remote_failure");
        assert!(err.to_string().contains("code 77"));

        // An offline ledger surfaces as a remote failure, never a panic.
        let m = Marketplace::new();
        m.ledger.set_offline(true);
        let err = m.lifecycle.fetch_active_listings().await.unwrap_err();
        assert!(matches!(err, LifecycleError::Ledger(_)));
    }
}

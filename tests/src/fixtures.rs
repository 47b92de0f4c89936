//! Shared setup for integration flows.

use std::sync::Arc;

use shared_types::{Address, MarketplaceConfig};
use tl_01_ledger_gateway::{InMemoryLedger, InMemoryWallet};
use tl_03_ticket_lifecycle::TicketLifecycleService;

/// One display unit in smallest units.
pub const ONE: u64 = 1_000_000_000;

/// A marketplace on the in-memory ledger with funded participants.
pub struct Marketplace {
    /// Deployment configuration.
    pub config: MarketplaceConfig,
    /// Ledger double.
    pub ledger: Arc<InMemoryLedger>,
    /// Lifecycle engine over the ledger.
    pub lifecycle: TicketLifecycleService<InMemoryLedger>,
    /// Holder of the admin capability.
    pub admin: InMemoryWallet,
    /// Verified-seller candidate.
    pub seller: InMemoryWallet,
    /// Ticket buyer.
    pub buyer: InMemoryWallet,
}

impl Marketplace {
    /// Fresh marketplace; every participant starts with 10 display units.
    pub fn new() -> Self {
        let config = MarketplaceConfig::for_testing();
        let ledger = Arc::new(InMemoryLedger::from_config(&config));
        let admin = Self::funded(&ledger, config.admin_address.clone());
        let seller = Self::funded(&ledger, Address::new("0xseller"));
        let buyer = Self::funded(&ledger, Address::new("0xbuyer"));
        Self {
            lifecycle: TicketLifecycleService::new(ledger.clone(), config.clone()),
            config,
            ledger,
            admin,
            seller,
            buyer,
        }
    }

    /// A wallet for `address` holding 10 display units.
    pub fn funded(ledger: &Arc<InMemoryLedger>, address: Address) -> InMemoryWallet {
        ledger.fund(&address, 10 * ONE);
        InMemoryWallet::new(ledger.clone(), address)
    }
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}

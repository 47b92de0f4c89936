//! # Marketplace Configuration
//!
//! Network, package and admin identifiers. Every ledger type string and
//! RPC endpoint is derived from here.
//!
//! ```toml
//! network = "testnet"
//! package_id = "0xd0fb..."
//! admin_address = "0x8dc5..."
//! escrow_admin_cap_id = "0xdd40..."
//! ```

use crate::entities::{Address, ObjectId};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ledger network the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
    /// Developer network, reset frequently.
    Devnet,
    /// Local validator.
    Localnet,
}

impl Network {
    /// Lowercase network name, as carried in QR claims.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Localnet => "localnet",
        }
    }

    /// Public full-node endpoint for this network.
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Self::Testnet => "https://fullnode.testnet.sui.io:443",
            Self::Devnet => "https://fullnode.devnet.sui.io:443",
            Self::Localnet => "http://127.0.0.1:9000",
        }
    }

    /// Anything other than mainnet.
    pub fn is_test_network(self) -> bool {
        !matches!(self, Self::Mainnet)
    }

    /// Explorer link for a transaction digest.
    pub fn explorer_tx_url(self, digest: &str) -> String {
        match self {
            Self::Mainnet => format!("https://suiexplorer.com/txblock/{}", digest),
            other => format!(
                "https://suiexplorer.com/txblock/{}?network={}",
                digest,
                other.as_str()
            ),
        }
    }

    /// Faucets for topping up gas on test networks.
    pub fn faucets(self) -> &'static [&'static str] {
        match self {
            Self::Testnet => &[
                "https://stakely.io/faucet/sui-testnet-sui",
                "https://faucet.triangleplatform.com/sui/testnet",
            ],
            Self::Devnet => &["https://faucet.devnet.sui.io/gas"],
            Self::Localnet => &["http://127.0.0.1:9123/gas"],
            Self::Mainnet => &[],
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            "localnet" => Ok(Self::Localnet),
            other => Err(ConfigError::InvalidValue {
                field: "network",
                reason: format!("unknown network '{}'", other),
            }),
        }
    }
}

/// Fully qualified struct types of the marketplace package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypes {
    /// `{pkg}::ticket::Ticket`
    pub ticket: String,
    /// `{pkg}::ticket::SellerProfile`
    pub seller_profile: String,
    /// `{pkg}::ticket::Listing`
    pub listing: String,
    /// `{pkg}::ticket_escrow::Escrow`
    pub escrow: String,
    /// `{pkg}::ticket_escrow::EscrowAdminCap`
    pub escrow_admin_cap: String,
}

impl ObjectTypes {
    /// Derive every type string from a package id.
    pub fn for_package(package_id: &ObjectId) -> Self {
        Self {
            ticket: format!("{}::ticket::Ticket", package_id),
            seller_profile: format!("{}::ticket::SellerProfile", package_id),
            listing: format!("{}::ticket::Listing", package_id),
            escrow: format!("{}::ticket_escrow::Escrow", package_id),
            escrow_admin_cap: format!("{}::ticket_escrow::EscrowAdminCap", package_id),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Network the package is deployed on.
    pub network: Network,
    /// Full-node URL; defaults to the network's public endpoint.
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Published marketplace package.
    pub package_id: ObjectId,
    /// Address recognized by the package as the badge-granting admin.
    pub admin_address: Address,
    /// Capability object required by `refund`.
    pub escrow_admin_cap_id: ObjectId,
    /// Platform name stamped into QR claims.
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Balance (smallest units) below which test networks warn.
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: u64,
}

fn default_platform() -> String {
    "TadaaLah".to_string()
}

fn default_low_balance_threshold() -> u64 {
    100_000_000
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self::testnet_deployment()
    }
}

impl MarketplaceConfig {
    /// The public testnet deployment of the marketplace package.
    pub fn testnet_deployment() -> Self {
        Self {
            network: Network::Testnet,
            rpc_url: None,
            package_id: ObjectId::new(
                "0xd0fbe18753601de0ad3de8afc237fce5ae12ecadc3dbd1f2757afe0ef3ad14e7",
            ),
            admin_address: Address::new(
                "0x8dc5596ec77296eda91193077a08a57928e6b586378bd8ed794305ee93bf142f",
            ),
            escrow_admin_cap_id: ObjectId::new(
                "0xdd4091063dfd4d9336fbcda97a22f1230a61d80d867c38b46152810476e1d1d7",
            ),
            platform: default_platform(),
            low_balance_threshold: default_low_balance_threshold(),
        }
    }

    /// Create a config for testing against a local ledger double.
    pub fn for_testing() -> Self {
        Self {
            network: Network::Localnet,
            rpc_url: None,
            package_id: ObjectId::new("0xpkg"),
            admin_address: Address::new("0xadmin"),
            escrow_admin_cap_id: ObjectId::new("0xadmincap"),
            platform: default_platform(),
            low_balance_threshold: default_low_balance_threshold(),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `TL_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `TL_*` overrides from an arbitrary lookup.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup("TL_NETWORK") {
            self.network = network.parse()?;
        }
        if let Some(url) = lookup("TL_RPC_URL") {
            self.rpc_url = Some(url);
        }
        if let Some(package) = lookup("TL_PACKAGE_ID") {
            self.package_id = ObjectId::new(package);
        }
        if let Some(admin) = lookup("TL_ADMIN_ADDRESS") {
            self.admin_address = Address::new(admin);
        }
        if let Some(cap) = lookup("TL_ESCROW_ADMIN_CAP_ID") {
            self.escrow_admin_cap_id = ObjectId::new(cap);
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package_id.is_blank() {
            return Err(ConfigError::InvalidValue {
                field: "package_id",
                reason: "must not be empty".to_string(),
            });
        }
        if self.admin_address.is_blank() {
            return Err(ConfigError::InvalidValue {
                field: "admin_address",
                reason: "must not be empty".to_string(),
            });
        }
        if self.escrow_admin_cap_id.is_blank() {
            return Err(ConfigError::InvalidValue {
                field: "escrow_admin_cap_id",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Effective RPC endpoint.
    pub fn rpc_endpoint(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    /// Struct types derived from the package id.
    pub fn object_types(&self) -> ObjectTypes {
        ObjectTypes::for_package(&self.package_id)
    }
}

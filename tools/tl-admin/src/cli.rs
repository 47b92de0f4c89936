//! Command-line arguments.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// TL-Admin: TadaaLah operator CLI
#[derive(Parser, Debug)]
#[command(name = "tl-admin")]
#[command(about = "Gate scanning and read-only ledger lookups for the TadaaLah marketplace")]
pub struct Args {
    /// Marketplace TOML config (defaults to the public testnet deployment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured network (mainnet, testnet, devnet, localnet)
    #[arg(long, global = true)]
    pub network: Option<String>,

    /// Override the full-node RPC URL
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Log level filter
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert between display and smallest units
    #[command(subcommand)]
    Convert(ConvertCommand),

    /// Encode or validate ticket QR claims
    #[command(subcommand)]
    Qr(QrCommand),

    /// Scan payloads from stdin, one per line
    Gate(GateArgs),

    /// Show a ticket
    Ticket {
        /// Ticket object id
        id: String,
    },

    /// Show an escrow
    Escrow {
        /// Escrow object id
        id: String,
    },

    /// Show every active listing
    Listings,

    /// Show tickets owned by an address with their escrows
    Purchases {
        /// Owner address
        address: String,
    },

    /// Show the gas balance of an address
    Balance {
        /// Account address
        address: String,
    },
}

/// `convert` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConvertCommand {
    /// Display amount (e.g. 1.5) to smallest units
    ToSmallest {
        /// Display amount
        amount: String,
    },
    /// Smallest units to display amount
    ToDisplay {
        /// Smallest-unit amount
        amount: String,
    },
}

/// `qr` subcommands.
#[derive(Subcommand, Debug)]
pub enum QrCommand {
    /// Print the payload and data URL for a ticket
    Encode {
        /// Ticket object id
        ticket_id: String,
        /// Extra payload fields as key=value
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Write the SVG to this file
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Validate a scanned payload against the ledger
    Validate {
        /// Scanned payload (JSON claim or bare ticket id)
        payload: String,
    },
}

/// `gate` options.
#[derive(ClapArgs, Debug)]
pub struct GateArgs {
    /// Print Prometheus metrics when input ends
    #[arg(long)]
    pub metrics: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

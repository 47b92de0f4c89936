//! Subcommand execution.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use shared_types::{Address, MarketplaceConfig, ObjectId, SystemTimeSource};
use tl_01_ledger_gateway::JsonRpcLedgerGateway;
use tl_02_money_codec::{parse_display_amount, to_display_unit_str};
use tl_03_ticket_lifecycle::{TicketLifecycleApi, TicketLifecycleService};
use tl_04_qr_claim::{ClaimVerifier, QrClaimService};
use tl_05_gate_scan::GateScanSession;
use tl_telemetry::gather_metrics;

use crate::cli::{Command, ConvertCommand, GateArgs, QrCommand};
use crate::render;

type Lifecycle = TicketLifecycleService<JsonRpcLedgerGateway>;
type Claims = QrClaimService<JsonRpcLedgerGateway, SystemTimeSource>;

/// Ledger-backed services for one invocation.
struct Services {
    lifecycle: Lifecycle,
    claims: Claims,
}

impl Services {
    fn connect(config: &MarketplaceConfig) -> Result<Self> {
        let gateway = Arc::new(
            JsonRpcLedgerGateway::from_config(config).context("creating RPC client")?,
        );
        info!(
            "[tl-admin] {} via {}",
            config.network,
            config.rpc_endpoint()
        );
        Ok(Self {
            lifecycle: TicketLifecycleService::new(gateway.clone(), config.clone()),
            claims: QrClaimService::new(gateway, config.clone(), SystemTimeSource),
        })
    }
}

/// Run one subcommand against `config`.
pub async fn run(command: Command, config: MarketplaceConfig) -> Result<()> {
    match command {
        Command::Convert(convert) => println!("{}", run_convert(&convert)?),
        Command::Qr(qr) => run_qr(qr, &config).await?,
        Command::Gate(args) => run_gate(args, &config).await?,
        Command::Ticket { id } => {
            let services = Services::connect(&config)?;
            match services.lifecycle.fetch_ticket(&ObjectId::new(id.as_str())).await? {
                Some(ticket) => print!("{}", render::ticket(&ticket)),
                None => bail!("Ticket {} not found", id),
            }
        }
        Command::Escrow { id } => {
            let services = Services::connect(&config)?;
            match services.lifecycle.fetch_escrow(&ObjectId::new(id.as_str())).await? {
                Some(escrow) => print!("{}", render::escrow(&escrow)),
                None => bail!("Escrow {} not found", id),
            }
        }
        Command::Listings => {
            let services = Services::connect(&config)?;
            let listings = services.lifecycle.fetch_active_listings().await?;
            if listings.is_empty() {
                println!("No active listings");
            }
            for entry in &listings {
                println!("{}", render::listing(entry));
            }
        }
        Command::Purchases { address } => {
            let services = Services::connect(&config)?;
            let purchases = services
                .lifecycle
                .fetch_user_purchases(&Address::new(address.as_str()))
                .await?;
            if purchases.is_empty() {
                println!("No tickets owned by {}", address);
            }
            for entry in &purchases {
                println!("{}", render::purchase(entry));
            }
        }
        Command::Balance { address } => {
            let services = Services::connect(&config)?;
            let report = services
                .lifecycle
                .check_balance(&Address::new(address.as_str()))
                .await?;
            println!("{}", render::balance(&report));
        }
    }
    Ok(())
}

/// Pure conversions; no ledger access.
pub fn run_convert(command: &ConvertCommand) -> Result<String> {
    Ok(match command {
        ConvertCommand::ToSmallest { amount } => parse_display_amount(amount)?.to_string(),
        ConvertCommand::ToDisplay { amount } => to_display_unit_str(amount)?,
    })
}

async fn run_qr(command: QrCommand, config: &MarketplaceConfig) -> Result<()> {
    let services = Services::connect(config)?;
    match command {
        QrCommand::Encode {
            ticket_id,
            fields,
            svg,
        } => {
            let context: Map<String, Value> = fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            let encoded = services
                .claims
                .encode(&ObjectId::new(ticket_id), &context)?;
            println!("{}", encoded.payload);
            println!("{}", encoded.data_url);
            if let Some(path) = svg {
                std::fs::write(&path, &encoded.svg)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("SVG written to {}", path.display());
            }
        }
        QrCommand::Validate { payload } => {
            let result = services.claims.verify_payload(&payload).await;
            print!("{}", render::verdict(&result));
            if let Some(rejection) = result.rejection() {
                bail!("claim rejected ({})", rejection.kind());
            }
        }
    }
    Ok(())
}

async fn run_gate(args: GateArgs, config: &MarketplaceConfig) -> Result<()> {
    let services = Services::connect(config)?;
    let mut session = GateScanSession::new(SystemTimeSource);
    println!(
        "Gate scanner ready on {}. One payload per line, Ctrl-D to finish.",
        config.network
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }
        let record = session.scan_payload(&services.claims, payload).await;
        print!("{}", render::scan(&record));
        println!("{}", render::statistics(&session.statistics()));
    }

    println!("Final: {}", render::statistics(&session.statistics()));
    if args.metrics {
        print!("{}", gather_metrics()?);
    }
    Ok(())
}

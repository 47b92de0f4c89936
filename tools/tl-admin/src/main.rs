//! TL-Admin: TadaaLah operator CLI

use anyhow::Result;
use clap::Parser;

use tl_admin::{load_config, run, Args};
use tl_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_telemetry(TelemetryConfig::for_tool("tl-admin", &args.log_level))?;

    let config = load_config(
        args.config.as_deref(),
        args.network.as_deref(),
        args.rpc_url.as_deref(),
    )?;
    run(args.command, config).await
}

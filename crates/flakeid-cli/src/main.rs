mod config;
mod demo;
mod telemetry;

use clap::Parser;
use config::{CliArgs, DemoConfig};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DemoConfig::try_from(args)?;

    init_telemetry()?;

    tracing::info!(
        node_id = config.node_id,
        partition_id = config.partition_id,
        count = config.count,
        epoch_ms = config.epoch.as_millis() as u64,
        "generating ids"
    );
    if cfg!(debug_assertions) {
        tracing::debug!("full config: {config:#?}");
    }

    let stdout = std::io::stdout();
    demo::run(&config, &mut stdout.lock())
}

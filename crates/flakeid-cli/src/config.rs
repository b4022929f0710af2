use core::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use flakeid::{DEFAULT_EPOCH, SystemClock, SnowflakeId};

/// Runtime configuration for the `flakeid` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid",
    version,
    about = "Generate and decompose Snowflake IDs for one node"
)]
pub struct CliArgs {
    /// Node identifier embedded in every ID (0-31).
    ///
    /// Every generator in a deployment needs a distinct (node, partition)
    /// pair; nothing checks this for you.
    ///
    /// Environment variable: `NODE_ID`
    #[arg(long, env = "NODE_ID", default_value_t = 30, allow_negative_numbers = true)]
    pub node_id: i64,

    /// Partition identifier embedded in every ID (0-31).
    ///
    /// Environment variable: `PARTITION_ID`
    #[arg(long, env = "PARTITION_ID", default_value_t = 3, allow_negative_numbers = true)]
    pub partition_id: i64,

    /// Number of IDs to generate.
    ///
    /// Environment variable: `COUNT`
    #[arg(short = 'n', long, env = "COUNT", default_value_t = 2)]
    pub count: usize,

    /// Epoch in milliseconds since 1970-01-01 UTC. Decomposed timestamps are
    /// relative to it.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// How many times to retry a single ID after the clock moved backward.
    ///
    /// Each retry waits for the reported skew before trying again.
    ///
    /// Environment variable: `MAX_RETRIES`
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Output format.
    ///
    /// Environment variable: `OUTPUT`
    #[arg(long, env = "OUTPUT", value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines per ID.
    Text,
    /// One JSON object per ID.
    Json,
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub node_id: i64,
    pub partition_id: i64,
    pub count: usize,
    pub epoch: Duration,
    pub max_retries: u32,
    pub output: OutputFormat,
}

impl DemoConfig {
    pub const fn clock(&self) -> SystemClock {
        SystemClock::with_epoch(self.epoch)
    }
}

impl TryFrom<CliArgs> for DemoConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("COUNT must be greater than 0");
        }

        let epoch = Duration::from_millis(args.epoch_ms);
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .context("system clock is before 1970")?;
        if epoch > now {
            bail!(
                "EPOCH_MS ({}) is in the future (now = {})",
                args.epoch_ms,
                now.as_millis()
            );
        }

        let elapsed = (now - epoch).as_millis();
        if elapsed > u128::from(SnowflakeId::max_timestamp()) {
            bail!(
                "EPOCH_MS ({}) is too far in the past: {elapsed}ms does not fit in the timestamp field",
                args.epoch_ms
            );
        }

        Ok(Self {
            node_id: args.node_id,
            partition_id: args.partition_id,
            count: args.count,
            epoch,
            max_retries: args.max_retries,
            output: args.output,
        })
    }
}

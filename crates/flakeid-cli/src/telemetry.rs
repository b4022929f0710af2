//! Console logging for the demo binary.
//!
//! Events go to stderr through `tracing_subscriber::fmt`, so stdout carries
//! only generated IDs. The level comes from `RUST_LOG` and defaults to
//! `info`; `RUST_LOG=flakeid=trace` also shows the generator's own spans.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;
    Ok(())
}

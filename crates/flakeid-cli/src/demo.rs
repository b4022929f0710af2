use core::time::Duration;
use std::io::Write;

use anyhow::Context;
use flakeid::{Generator, SnowflakeId, TimeSource, decompose};

use crate::config::{DemoConfig, OutputFormat};

/// Generates `config.count` IDs and writes them to `out`.
pub fn run(config: &DemoConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = Generator::with_clock(config.node_id, config.partition_id, config.clock())
        .context("invalid generator configuration")?;

    for _ in 0..config.count {
        let id = generate_with_retry(&generator, config.max_retries, std::thread::sleep)?;
        write_id(out, id, config)?;
    }
    out.flush()?;
    Ok(())
}

/// Generates one ID, waiting out a backward clock up to `max_retries` times.
///
/// The generator never retries a backward clock itself; waiting for the
/// reported skew and trying again is left to the caller, which is what this
/// does.
pub fn generate_with_retry<T>(
    generator: &Generator<T>,
    max_retries: u32,
    mut sleep: impl FnMut(Duration),
) -> flakeid::Result<SnowflakeId>
where
    T: TimeSource,
{
    let mut attempt = 0;
    loop {
        match generator.generate() {
            Ok(id) => return Ok(id),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                let wait = Duration::from_millis(e.behind_by().unwrap_or(1));
                tracing::warn!(attempt, ?wait, "{e}; retrying");
                sleep(wait);
            }
            Err(e) => return Err(e),
        }
    }
}

fn write_id(out: &mut impl Write, id: SnowflakeId, config: &DemoConfig) -> anyhow::Result<()> {
    match config.output {
        OutputFormat::Text => {
            let parts = decompose(id);
            writeln!(out, "ID: {id}")?;
            let decimal = id.to_string();
            writeln!(out, "String: {decimal}")?;
            writeln!(out, "Uint64: {}", id.to_u64())?;
            let fields: Vec<_> = parts
                .fields()
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect();
            writeln!(out, "DecomposeID: map[{}]", fields.join(" "))?;
            writeln!(out, "UnixMillis: {}", parts.unix_millis(config.epoch))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &decompose(id))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

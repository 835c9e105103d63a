use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log to stderr; stdout carries command output (tables, JSON).
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("parse log level '{default_level}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init logging: {e}"))
}

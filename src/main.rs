//! dial — a radial system-gauge overlay for Wayland desktops.
//!
//! Run with:  `RUST_LOG=info dial`

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("dial v{} starting", env!("CARGO_PKG_VERSION"));

    let path = dial_config::default_path();
    let config = dial_config::load(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    dial_wayland::run(config).context("overlay failed")
}

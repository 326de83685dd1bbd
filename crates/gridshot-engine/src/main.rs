//! # Gridshot
//!
//! Headless entry point: loads `gridshot.toml` (or the path given as the
//! first argument), plays the configured map with the autopilot and records
//! the score.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use gridshot_engine::{app, EngineConfig, CONFIG_FILE};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());

    // Peek at the log filter before the subscriber exists; load again below
    // so the load itself is logged. A bad filter falls back to the default
    // and `validate` reports it.
    let (directive, _) = EngineConfig::load_from(&config_path).log_directive();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(directive))
        .init();

    info!("Gridshot starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = EngineConfig::load_from(&config_path);
    config.validate();

    let summary = app::run(&config)?;
    if let Some(rank) = summary.high_score_rank {
        info!("Score {} placed #{} in the high-score table", summary.score, rank + 1);
    }

    info!("Gridshot shutdown complete");
    Ok(())
}

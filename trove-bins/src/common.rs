//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and setup code.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use trove_core::config::{ProfileName, TraderConfig};
use trove_strategies::TraderStats;

/// Common CLI arguments for all binaries
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CommonArgs {
    /// TOML configuration file (overrides --profile)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Built-in profile: round-four or market-making
    #[arg(short, long, default_value = "round-four")]
    pub profile: String,

    /// Log level (defaults to the configuration's)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CommonArgs {
    /// Configuration from `--config`, or the named built-in profile
    pub fn load_config(&self) -> Result<TraderConfig> {
        let profile = ProfileName::from_str(&self.profile)
            .ok_or_else(|| anyhow!("Unknown profile '{}'", self.profile))?;
        TraderConfig::load_or_profile(self.config.as_ref(), profile)
            .context("Failed to load trader configuration")
    }
}

/// Initialize tracing/logging on stderr
///
/// CLI flags win over the configuration's `[logging]` section.
pub fn init_logging(args: &CommonArgs, config: &TraderConfig) -> Result<()> {
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let json = args.json_logs || config.logging.json;
    trove_core::utils::init_logger(level, json).context("Failed to initialize logging")
}

/// Print final statistics
pub fn print_stats(stats: &TraderStats) {
    tracing::info!("=== Final Statistics ===");
    tracing::info!("Ticks processed: {}", stats.ticks_processed);
    tracing::info!("Orders emitted: {}", stats.orders_emitted);
    tracing::info!("Limit violations dropped: {}", stats.dropped_violations);
    tracing::info!("State resets: {}", stats.state_resets);

    if stats.ticks_processed > 0 {
        let per_tick = stats.orders_emitted as f64 / stats.ticks_processed as f64;
        tracing::info!("Orders per tick: {:.2}", per_tick);
    }
}

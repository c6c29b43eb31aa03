//! Line-oriented tick adapter
//!
//! Reads one `TradingState` JSON object per line (file or stdin) and writes
//! one `TickResult` JSON object per line to stdout. Logs go to stderr.
//!
//! ```text
//! trove-tick --profile round-four ticks.jsonl > results.jsonl
//! harness | trove-tick --config trader.toml | harness
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use trove_bins::common::{init_logging, print_stats, CommonArgs};
use trove_core::TradingState;
use trove_strategies::Trader;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the trading core over JSON-lines ticks")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Tick file, one TradingState per line (stdin when omitted)
    input: Option<PathBuf>,

    /// Feed each tick's trader data into the next tick whose own is empty
    #[arg(long)]
    carry_state: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = args.common.load_config()?;
    init_logging(&args.common, &config)?;

    tracing::info!("=== Trove: tick adapter ===");
    tracing::info!(
        "Engines: {} market making, {} spreads, {} volatility",
        config.market_making.len(),
        config.spreads.len(),
        config.volatility.len()
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    let mut trader = Trader::new(config);
    let mut carried = String::new();
    let mut skipped = 0u64;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let mut input: TradingState = match serde_json::from_str(&line) {
            Ok(input) => input,
            Err(e) => {
                tracing::error!("Line {}: invalid trading state: {}", line_no + 1, e);
                skipped += 1;
                continue;
            }
        };
        if args.carry_state && input.trader_data.is_empty() {
            input.trader_data = std::mem::take(&mut carried);
        }

        let result = trader.run(&input);
        serde_json::to_writer(&mut out, &result).context("Failed to write tick result")?;
        out.write_all(b"\n")?;
        out.flush()?;

        if args.carry_state {
            carried = result.trader_data;
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} invalid lines", skipped);
    }
    print_stats(&trader.stats());

    Ok(())
}

//! Stockbook CLI - read-only reports over a JSON ledger file.
//!
//! Commands:
//! - `stockbook dashboard` - Revenue, profit and units sold
//! - `stockbook report` - Sales report for a date range
//! - `stockbook stock` - Stock per product and location
//! - `stockbook cost` - FIFO cost of selling a quantity now
//! - `stockbook valuation` - FIFO value of stock on hand
//! - `stockbook last-sale` - Latest sale of a product at a location

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use stockbook_infra::{AppContext, Config, InMemoryLedgerStore, config};
use stockbook_inventory::LedgerSnapshot;

use commands::Command;

/// Inventory and FIFO profit reports for a two-location shop
#[derive(Parser)]
#[command(name = "stockbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger file (`{"products": [...], "restocks": [...], ...}`); empty ledger if omitted.
    /// Record ids in the file must be UUIDs.
    #[arg(short, long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging first, so warnings raised while reading the config are emitted.
    let log_format = config::log_format_from_env().context("invalid STOCKBOOK_LOG_FORMAT")?;
    stockbook_observability::init(log_format);
    let config = Config::from_env().context("invalid STOCKBOOK_* configuration")?;

    let snapshot = match cli.ledger.as_deref() {
        Some(path) => load_ledger(path)?,
        None => LedgerSnapshot::default(),
    };
    let store = InMemoryLedgerStore::seeded(config.owner_id, snapshot);
    let ctx = AppContext::bootstrap(config, store)
        .await
        .context("failed to load ledger")?;

    let output = commands::run(&cli.command, ctx.service())?;
    println!("{output}");

    Ok(())
}

fn load_ledger(path: &Path) -> Result<LedgerSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger file {}", path.display()))?;
    let snapshot = parse_ledger(&raw)
        .with_context(|| format!("failed to parse ledger file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "ledger file loaded");
    Ok(snapshot)
}

fn parse_ledger(raw: &str) -> Result<LedgerSnapshot> {
    serde_json::from_str(raw).context("expected camelCase records with UUID ids")
}

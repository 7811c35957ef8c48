//! Content sanity checker.
//!
//! Loads the item catalog and trade pricing exactly the way the engine does
//! at startup and prints what it finds. Any malformed or invalid record
//! makes the run exit nonzero, so this doubles as a pre-commit gate for
//! content edits.

use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;
use hoard_engine::data_paths::{data_path, data_root};
use hoard_engine::loader::trade::load_trade;
use hoard_engine::{TradeConfig, load_catalog};

fn main() -> Result<()> {
    env_logger::init();

    let root = data_root();
    println!("Checking content under {}", root.display().to_string().bold());

    let catalog = load_catalog().context("while checking item records")?;
    println!(
        "  {} {} items, {} groups",
        "ok".green().bold(),
        catalog.item_count(),
        catalog.group_count()
    );
    if catalog.is_empty() {
        println!("  {} the catalog has no items", "warning:".yellow().bold());
    }

    // The engine falls back to built-in pricing when trade.toml is broken;
    // a checker should fail loudly instead.
    let trade_path = data_path("trade.toml");
    if trade_path.is_file() {
        let raw = fs::read_to_string(&trade_path)
            .with_context(|| format!("reading '{}'", trade_path.display()))?;
        toml::from_str::<TradeConfig>(&raw)
            .with_context(|| format!("while checking '{}'", trade_path.display()))?;
    } else {
        println!(
            "  {} no trade.toml; built-in pricing will be used",
            "warning:".yellow().bold()
        );
    }
    let trade = load_trade(&trade_path);
    println!(
        "  {} {} trade tiers, persuasion step {}",
        "ok".green().bold(),
        trade.tiers.len(),
        trade.persuasion_step
    );

    println!("{}", "Content check passed.".green().bold());
    Ok(())
}

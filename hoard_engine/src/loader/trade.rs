//! Trade pricing tiers and loader.
//!
//! Merchants price goods off the trader's disposition towards the customer.
//! Each tier maps a minimum disposition to a pair of multipliers, one for
//! what the customer pays when buying and one for what the merchant pays
//! when buying back. Tiers live in `trade.toml` beside the item records.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One pricing tier: applies to any disposition at or above its minimum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TradeTier {
    /// Lowest disposition (-100 to 100) that still earns this tier
    pub min_disposition: i32,
    /// Multiplier on base cost when the customer is buying
    pub buying: f32,
    /// Multiplier on base cost when the customer is selling
    pub selling: f32,
}

/// Complete pricing configuration for trading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// Sorted list of tiers (highest minimum disposition first)
    pub tiers: Vec<TradeTier>,
    /// Multiplier shift per rank of persuasion advantage
    pub persuasion_step: f32,
    /// Floor under every computed multiplier
    pub minimum_multiplier: f32,
    /// Buying multiplier when either party is unknown
    pub neutral_buying: f32,
    /// Selling multiplier when either party is unknown
    pub neutral_selling: f32,
    /// Fines for caught theft are the stack's cost times this
    pub theft_fine_multiplier: f32,
}

impl TradeConfig {
    /// Returns the (buying, selling) multipliers earned by a disposition.
    /// Dispositions below every tier price like a stranger.
    pub fn multipliers(&self, disposition: i32) -> (f32, f32) {
        for tier in &self.tiers {
            if disposition >= tier.min_disposition {
                return (tier.buying, tier.selling);
            }
        }
        (self.neutral_buying, self.neutral_selling)
    }
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            tiers: default_trade_tiers(),
            persuasion_step: 0.05,
            minimum_multiplier: 0.05,
            neutral_buying: 1.25,
            neutral_selling: 0.25,
            theft_fine_multiplier: 2.0,
        }
    }
}

/// Returns hardcoded default pricing tiers.
///
/// These defaults are used if `trade.toml` cannot be loaded or parsed.
/// Tiers are sorted from highest to lowest minimum disposition.
fn default_trade_tiers() -> Vec<TradeTier> {
    vec![
        TradeTier {
            min_disposition: 100,
            buying: 1.00,
            selling: 0.50,
        },
        TradeTier {
            min_disposition: 75,
            buying: 1.10,
            selling: 0.40,
        },
        TradeTier {
            min_disposition: 50,
            buying: 1.15,
            selling: 0.35,
        },
        TradeTier {
            min_disposition: 25,
            buying: 1.20,
            selling: 0.30,
        },
        TradeTier {
            min_disposition: 0,
            buying: 1.25,
            selling: 0.25,
        },
        TradeTier {
            min_disposition: -25,
            buying: 1.35,
            selling: 0.15,
        },
    ]
}

/// Loads trade pricing from a TOML file, falling back to defaults on error.
///
/// This function never fails - it returns defaults if the file cannot be
/// loaded or parsed.
///
/// # Logging
/// - `info!` on successful load
/// - `warn!` if file cannot be read or parsed (with fallback to defaults)
pub fn load_trade(toml_path: &Path) -> TradeConfig {
    match try_load_trade(toml_path) {
        Ok(config) => {
            info!(
                "{} trade pricing tiers loaded from '{}'",
                config.tiers.len(),
                toml_path.display()
            );
            config
        },
        Err(e) => {
            warn!(
                "Could not load trade pricing from '{}': {}. Using hardcoded defaults.",
                toml_path.display(),
                e
            );
            TradeConfig::default()
        },
    }
}

/// Attempts to load trade pricing from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
fn try_load_trade(toml_path: &Path) -> Result<TradeConfig> {
    let trade_file = fs::read_to_string(toml_path)
        .with_context(|| format!("reading trade pricing from '{}'", toml_path.display()))?;

    let mut config: TradeConfig = toml::from_str(&trade_file)
        .with_context(|| format!("parsing trade pricing from '{}'", toml_path.display()))?;

    // Sort tiers by minimum disposition descending (highest first)
    config.tiers.sort_by(|a, b| b.min_disposition.cmp(&a.min_disposition));

    Ok(config)
}

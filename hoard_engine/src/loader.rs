//! Loader utilities for building a [`Catalog`] from content on disk.
//!
//! Item records are RON files, one per item, under `items/`; named groups
//! and shared fragments are optional RON files beside that directory. Trade
//! pricing stays TOML-backed.

pub mod itemdef;
pub mod seeds;
pub mod trade;

use std::path::Path;

use anyhow::{Context, Result, bail};
use hoard_data::{CatalogDef, validate_catalog};
use log::info;

use crate::catalog::Catalog;
use crate::data_paths::data_root;
use crate::loader::itemdef::{build_catalog_from_def, load_catalog_def};

/// Load the item catalog from the default content directory.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or failed validation.
pub fn load_catalog() -> Result<Catalog> {
    load_catalog_at(&data_root())
}

/// Load the item catalog from an explicit content directory. Tools and
/// tests point this at scratch directories.
pub fn load_catalog_at(content_dir: &Path) -> Result<Catalog> {
    let def = load_catalog_def(
        &content_dir.join("items"),
        &content_dir.join("groups.ron"),
        &content_dir.join("fragments.ron"),
    )?;
    validate_catalog_def(&def)?;
    let catalog =
        build_catalog_from_def(&def).context("while building catalog from item records")?;
    info!("{} item templates added to catalog", catalog.item_count());
    info!("{} item groups added to catalog", catalog.group_count());
    Ok(catalog)
}

/// Validate the merged catalog definition and return a single aggregated
/// error listing every finding.
fn validate_catalog_def(def: &CatalogDef) -> Result<()> {
    let errors = validate_catalog(def);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("catalog validation failed:\n{details}");
}

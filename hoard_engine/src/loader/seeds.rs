//! Seeding helpers for outfitting containers from authored inventories.
//!
//! An [`InventorySeedDef`] describes starting contents bag by bag. Entries
//! are spawned from the catalog and pushed through the owner's normal add
//! path so acceptance checks and hooks fire exactly as they would for loot
//! picked up in play.

use anyhow::{Context, Result};
use hoard_data::{InventorySeedDef, ItemRefDef, SlotEntryDef, StackSizeDef};
use log::warn;
use rand::Rng;

use crate::catalog::Catalog;
use crate::container::Container;
use crate::inventory::LoadContext;
use crate::item::Item;
use crate::owner::Owner;
use crate::slot::BagKind;

/// Outfit `container` with everything `seed` describes.
///
/// Entries the container refuses are logged and skipped rather than
/// aborting the load; oversized stacks are trimmed to whatever the
/// container will take.
///
/// # Errors
/// - on entries referencing unknown catalog ids or empty groups
pub fn apply_seed(
    container: &mut dyn Container,
    seed: &InventorySeedDef,
    catalog: &Catalog,
    ctx: LoadContext,
) -> Result<()> {
    apply_entries(container, BagKind::QuickUse, &seed.quick_use, catalog, ctx)?;
    apply_entries(container, BagKind::Backpack, &seed.backpack, catalog, ctx)?;
    apply_entries(container, BagKind::Equipped, &seed.equipped, catalog, ctx)?;
    apply_entries(container, BagKind::Merchant, &seed.merchant, catalog, ctx)?;
    Ok(())
}

fn apply_entries(
    container: &mut dyn Container,
    kind: BagKind,
    entries: &[SlotEntryDef],
    catalog: &Catalog,
    ctx: LoadContext,
) -> Result<()> {
    for entry in entries {
        let mut item = spawn_entry(catalog, entry)
            .with_context(|| format!("while outfitting {}", container.display_name()))?;
        let check = container.can_add_item(&item);
        if check.is_denied() {
            warn!(
                "{} refused seeded item '{}': {}",
                container.display_name(),
                item.id,
                check.message.unwrap_or_default()
            );
            continue;
        }
        if !item.infinite && check.allowed < item.stack_size {
            warn!(
                "{} takes only {} of {} seeded '{}'",
                container.display_name(),
                check.allowed,
                item.stack_size,
                item.id
            );
            item.stack_size = check.allowed;
        }
        if let Some(displaced) = container.add_item(kind, item, entry.slot, ctx) {
            warn!(
                "seeding displaced '{}' from {} ({kind:?} bag)",
                displaced.id,
                container.display_name()
            );
        }
    }
    Ok(())
}

/// Spawn one authored entry: resolve the item or group reference, size the
/// stack, and stamp the owner.
///
/// # Errors
/// - on unknown item ids, unknown group ids, or empty groups
pub fn spawn_entry(catalog: &Catalog, entry: &SlotEntryDef) -> Result<Item> {
    let mut item = match &entry.item {
        ItemRefDef::Item(id) => catalog.spawn(id)?,
        ItemRefDef::Group(id) => catalog.spawn_from_group(id)?,
    };
    match entry.stack {
        StackSizeDef::Exact(stack) => item.stack_size = clamped_stack(&item, stack),
        StackSizeDef::Range { min, max } => {
            let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
            let stack = rand::rng().random_range(lo..=hi);
            item.stack_size = clamped_stack(&item, stack);
        },
        StackSizeDef::Infinite => item.infinite = true,
    }
    item.owner = Owner::from(&entry.owner);
    Ok(item)
}

/// Stacks clamp to the definition's capacity; items that do not stack
/// always spawn as a single unit.
fn clamped_stack(item: &Item, want: u32) -> u32 {
    if item.stackable() {
        want.clamp(1, item.max_stack)
    } else {
        1
    }
}

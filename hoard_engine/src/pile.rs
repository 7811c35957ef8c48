//! Pile Module
//!
//! Dropped loot on the ground. A [`Pile`] is a backpack-only container that
//! exists to hold several stacks at once; the moment it holds fewer than two
//! it is flagged for collapse, and when the loot screen closes a collapsed
//! pile dissolves back into at most one plain dropped item.

use crate::Id;
use crate::container::Container;
use crate::inventory::{Inventory, LoadContext};
use crate::item::Item;
use crate::slot::BagKind;

/// Loot dropped together on the ground. Contents live in the backpack bag.
#[derive(Debug, Default)]
pub struct Pile {
    pub id: Id,
    inventory: Inventory,
    should_be_removed: bool,
}

impl Pile {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_lowercase(),
            inventory: Inventory::new(),
            should_be_removed: false,
        }
    }

    /// Drop a stack onto the pile.
    pub fn drop_item(&mut self, item: Item) -> Option<Item> {
        self.add_item(BagKind::Backpack, item, None, LoadContext::Live)
    }

    /// Whether the pile has dwindled to the point of not being a pile.
    pub fn should_collapse(&self) -> bool {
        self.should_be_removed
    }

    /// Dissolve the pile, handing back its final stack if one remains.
    pub fn into_last_item(mut self) -> Option<Item> {
        let slot = self
            .inventory
            .bag(BagKind::Backpack)
            .iter()
            .next()
            .map(|(slot, _)| slot)?;
        self.inventory.bag_mut(BagKind::Backpack).take(slot)
    }
}

impl Container for Pile {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    fn display_name(&self) -> String {
        "a pile of items".to_string()
    }

    fn on_item_add(&mut self, _item: &Item, kind: BagKind, _slot: u32, _ctx: LoadContext) {
        if kind == BagKind::Backpack && self.inventory.bag(BagKind::Backpack).len() > 1 {
            self.should_be_removed = false;
        }
    }

    fn on_item_remove(&mut self, _item: &Item, kind: BagKind, _slot: u32) {
        if kind == BagKind::Backpack && self.inventory.bag(BagKind::Backpack).len() < 2 {
            self.should_be_removed = true;
        }
    }
}

//! Inventory Module
//!
//! Slot-indexed bags, slot resolution, stack merging, and removal.
//! Container-specific capacity checks and side effects layer on top of
//! this in [`crate::container`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::slot::{BagKind, EquipSlot};

/// Whether a mutation happens in live play or while a save is being
/// restored. Restoring replays every add, but stat modifiers come back
/// with the persisted stat sheet and must not be applied twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadContext {
    #[default]
    Live,
    RestoringSave,
}

/// Outcome of a capacity or legality check: how many units may be added,
/// plus a short player-facing message when that is fewer than asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    pub allowed: u32,
    pub message: Option<String>,
}

impl Acceptance {
    pub fn allow(count: u32) -> Acceptance {
        Acceptance {
            allowed: count,
            message: None,
        }
    }

    pub fn deny(message: impl Into<String>) -> Acceptance {
        Acceptance {
            allowed: 0,
            message: Some(message.into()),
        }
    }

    pub fn is_denied(&self) -> bool {
        self.allowed == 0
    }
}

/// Result of placing an item into a bag.
#[derive(Debug)]
pub struct Placement {
    /// Slot the item landed in (or merged into).
    pub slot: u32,
    /// True when the item merged into an existing stack.
    pub merged: bool,
    /// Previous occupant displaced by the placement, if any.
    pub displaced: Option<Item>,
}

/// Sparse mapping from slot index to the stack occupying it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bag {
    slots: BTreeMap<u32, Item>,
}

impl Bag {
    /// Lowest non-negative slot index not currently occupied.
    pub fn first_free_slot(&self) -> u32 {
        let mut candidate = 0;
        for &slot in self.slots.keys() {
            if slot == candidate {
                candidate += 1;
            } else if slot > candidate {
                break;
            }
        }
        candidate
    }

    pub fn get(&self, slot: u32) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn get_mut(&mut self, slot: u32) -> Option<&mut Item> {
        self.slots.get_mut(&slot)
    }

    pub fn insert(&mut self, slot: u32, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    /// Remove and return whatever occupies the slot.
    pub fn take(&mut self, slot: u32) -> Option<Item> {
        self.slots.remove(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    /// Number of occupied slots; stacks count once.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total units across all stacks. Infinite stacks count as one.
    pub fn total_units(&self) -> u64 {
        self.slots.values().map(|item| u64::from(item.stack_size)).sum()
    }

    /// Slot of the first item with the given id, compared
    /// case-insensitively.
    pub fn slot_of(&self, id: &str) -> Option<u32> {
        self.iter().find(|(_, item)| item.matches_id(id)).map(|(slot, _)| slot)
    }

    /// Slot of the first occupant the incoming item could merge into.
    pub fn stackable_slot(&self, incoming: &Item) -> Option<u32> {
        self.iter()
            .find(|(_, occupant)| occupant.can_stack_with(incoming))
            .map(|(slot, _)| slot)
    }
}

/// The four bags every container owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    quick_use: Bag,
    backpack: Bag,
    equipped: Bag,
    merchant: Bag,
}

impl Inventory {
    pub fn new() -> Inventory {
        Inventory::default()
    }

    pub fn bag(&self, kind: BagKind) -> &Bag {
        match kind {
            BagKind::QuickUse => &self.quick_use,
            BagKind::Backpack => &self.backpack,
            BagKind::Equipped => &self.equipped,
            BagKind::Merchant => &self.merchant,
        }
    }

    pub fn bag_mut(&mut self, kind: BagKind) -> &mut Bag {
        match kind {
            BagKind::QuickUse => &mut self.quick_use,
            BagKind::Backpack => &mut self.backpack,
            BagKind::Equipped => &mut self.equipped,
            BagKind::Merchant => &mut self.merchant,
        }
    }

    /// Place an item into a bag.
    ///
    /// Without an explicit slot, the item first tries to merge into any
    /// stackable occupant, then falls back to the lowest free slot. A
    /// non-stackable occupant of the resolved slot is displaced and
    /// returned in the [`Placement`].
    pub fn place(&mut self, kind: BagKind, item: Item, slot: Option<u32>) -> Placement {
        let bag = self.bag_mut(kind);
        let slot = slot
            .or_else(|| bag.stackable_slot(&item))
            .unwrap_or_else(|| bag.first_free_slot());

        if let Some(occupant) = bag.get_mut(slot) {
            if occupant.can_stack_with(&item) {
                // infinite stacks absorb incoming units without growing
                if !occupant.infinite {
                    occupant.stack_size += item.stack_size;
                }
                return Placement {
                    slot,
                    merged: true,
                    displaced: None,
                };
            }
        }

        let displaced = bag.insert(slot, item);
        Placement {
            slot,
            merged: false,
            displaced,
        }
    }

    /// Remove from a slot.
    ///
    /// Infinite stacks always yield a fresh single unit and never
    /// shrink. Finite stacks pop one unit unless `whole_stack` is set or
    /// only one unit remains, in which case the slot empties. An
    /// unoccupied slot returns `None`.
    pub fn remove_from_bag(&mut self, kind: BagKind, slot: u32, whole_stack: bool) -> Option<Item> {
        let bag = self.bag_mut(kind);
        let occupant = bag.get_mut(slot)?;

        if occupant.infinite {
            return Some(occupant.fresh_unit());
        }
        if !whole_stack && occupant.stack_size > 1 {
            occupant.stack_size -= 1;
            return Some(occupant.fresh_unit());
        }
        bag.take(slot)
    }

    /// Drain every bag into the matching bags of another inventory,
    /// leaving this one empty. Slots are resolved fresh on the receiving
    /// side (merge first, then lowest free), so nothing is displaced and
    /// no units are lost.
    pub fn move_all_items_to(&mut self, other: &mut Inventory) {
        for kind in BagKind::ALL {
            let drained = std::mem::take(self.bag_mut(kind));
            for item in drained.slots.into_values() {
                other.place(kind, item, None);
            }
        }
    }

    /// Duplicate every stack into the matching bags of another inventory.
    /// Copies keep their stack counts and owners.
    pub fn copy_all_items_to(&self, other: &mut Inventory) {
        for kind in BagKind::ALL {
            for (_, item) in self.bag(kind).iter() {
                other.place(kind, item.clone(), None);
            }
        }
    }

    /// First item matching the id anywhere in the inventory.
    pub fn find_item(&self, id: &str) -> Option<(BagKind, u32, &Item)> {
        self.all_items().find(|(_, _, item)| item.matches_id(id))
    }

    /// Item equipped at a body position, if any.
    pub fn equipped_at(&self, slot: EquipSlot) -> Option<&Item> {
        self.equipped.get(slot.index())
    }

    /// Every stack in every bag.
    pub fn all_items(&self) -> impl Iterator<Item = (BagKind, u32, &Item)> + '_ {
        BagKind::ALL.into_iter().flat_map(move |kind| {
            self.bag(kind).iter().map(move |(slot, item)| (kind, slot, item))
        })
    }

    /// Occupied slots across all bags; stacks count once.
    pub fn total_items(&self) -> usize {
        BagKind::ALL.into_iter().map(|kind| self.bag(kind).len()).sum()
    }
}

//! Catalog Module
//!
//! The item catalog holds one pristine template per item id, plus the named
//! item groups used for random loot. Live items are always spawned from a
//! template, never shared, so mutating one on the ground can never bleed
//! into the next spawn.

use std::collections::HashMap;

use rand::prelude::IndexedRandom;
use thiserror::Error;

use crate::Id;
use crate::item::Item;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("unknown item id '{0}'")]
    UnknownItem(Id),
    #[error("unknown item group '{0}'")]
    UnknownGroup(Id),
    #[error("item group '{0}' has no members")]
    EmptyGroup(Id),
}

/// Every item template and item group known to the engine, keyed by
/// lowercase id.
#[derive(Debug, Default)]
pub struct Catalog {
    items: HashMap<Id, Item>,
    groups: HashMap<Id, Vec<Id>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item template under its lowercased id.
    pub fn insert_template(&mut self, item: Item) {
        self.items.insert(item.id.to_lowercase(), item);
    }

    /// Register a named group of item ids for random-loot draws.
    pub fn insert_group(&mut self, id: &str, members: Vec<Id>) {
        self.groups.insert(id.to_lowercase(), members);
    }

    pub fn template(&self, id: &str) -> Option<&Item> {
        self.items.get(&id.to_lowercase())
    }

    pub fn group(&self, id: &str) -> Option<&[Id]> {
        self.groups.get(&id.to_lowercase()).map(Vec::as_slice)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Spawn a single fresh unit of an item.
    pub fn spawn(&self, id: &str) -> Result<Item, SpawnError> {
        let template = self
            .template(id)
            .ok_or_else(|| SpawnError::UnknownItem(id.to_lowercase()))?;
        Ok(template.fresh_unit())
    }

    /// Spawn an item carrying a whole stack at once. Unstackable items are
    /// capped at a single unit.
    pub fn spawn_stack(&self, id: &str, stack: u32) -> Result<Item, SpawnError> {
        let mut item = self.spawn(id)?;
        item.stack_size = if item.stackable() {
            stack.clamp(1, item.max_stack)
        } else {
            1
        };
        Ok(item)
    }

    /// Spawn one fresh unit of a randomly drawn group member.
    pub fn spawn_from_group(&self, group_id: &str) -> Result<Item, SpawnError> {
        let members = self
            .groups
            .get(&group_id.to_lowercase())
            .ok_or_else(|| SpawnError::UnknownGroup(group_id.to_lowercase()))?;
        let mut rng = rand::rng();
        let member = members
            .choose(&mut rng)
            .ok_or_else(|| SpawnError::EmptyGroup(group_id.to_lowercase()))?;
        self.spawn(member)
    }
}

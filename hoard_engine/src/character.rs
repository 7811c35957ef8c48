//! Character Module
//!
//! A [`Character`] owns a full [`Inventory`] and enforces the rules that make
//! equipment meaningful: which slots an item may occupy, two-handed weapon
//! conflicts, scripted equip requirements, and the combat lock on armor.
//! Equipping and unequipping keep the character's [`StatSheet`], carried
//! light, and visual model in step through the [`Container`] hooks.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::container::Container;
use crate::inventory::{Acceptance, Inventory, LoadContext};
use crate::item::Item;
use crate::owner::Owner;
use crate::rule::RuleContext;
use crate::slot::{BagKind, EquipSlot};
use crate::stats::StatSheet;

/// Whether a character is currently fighting. Combat locks armor in place;
/// see [`crate::item::ItemKind::combat_restricted`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CombatState {
    #[default]
    Calm,
    Fighting,
}

/// Race-level survival data. Party-wide carrying limits for water and
/// rations are the sum of these over the party's active members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    pub max_water: f32,
    pub max_rations: f32,
}

impl Default for Race {
    fn default() -> Self {
        Self {
            name: "human".to_string(),
            max_water: 6.0,
            max_rations: 10.0,
        }
    }
}

/// A person in the world, playable or otherwise.
#[derive(Debug, Clone)]
pub struct Character {
    /// Unique id, stored lowercase.
    pub id: Id,
    pub name: String,
    /// Faction id, stored lowercase. Drives trade prices and theft claims.
    pub faction: Id,
    pub race: Race,
    /// Inactive party members do not contribute carrying capacity.
    pub active: bool,
    pub player_controlled: bool,
    pub combat: CombatState,
    pub stats: StatSheet,
    inventory: Inventory,
    /// Light radius contributed per equipped slot index.
    lights: BTreeMap<u32, u32>,
    /// Visual model override per equipped slot index.
    models: BTreeMap<u32, String>,
    /// This character's faction's opinion of other factions, keyed by
    /// lowercase faction id. Missing entries read as 0.
    dispositions: BTreeMap<Id, i32>,
}

impl Character {
    pub fn new(id: &str, name: &str, faction: &str) -> Self {
        Self {
            id: id.to_lowercase(),
            name: name.to_string(),
            faction: faction.to_lowercase(),
            race: Race::default(),
            active: true,
            player_controlled: false,
            combat: CombatState::Calm,
            stats: StatSheet::default(),
            inventory: Inventory::new(),
            lights: BTreeMap::new(),
            models: BTreeMap::new(),
            dispositions: BTreeMap::new(),
        }
    }

    /// The item equipped at `slot`, if any.
    pub fn equipped(&self, slot: EquipSlot) -> Option<&Item> {
        self.inventory.equipped_at(slot)
    }

    /// Search every bag for an item by id (case-insensitive).
    pub fn find_item(&self, id: &str) -> Option<(BagKind, u32, &Item)> {
        self.inventory.find_item(id)
    }

    /// Strongest light this character's equipment is giving off.
    pub fn light_radius(&self) -> u32 {
        self.lights.values().copied().max().unwrap_or(0)
    }

    /// Visual model attached at an equip slot, if the occupant carries one.
    pub fn model_at(&self, slot: EquipSlot) -> Option<&str> {
        self.models.get(&slot.index()).map(String::as_str)
    }

    pub fn set_disposition(&mut self, faction: &str, disposition: i32) {
        self.dispositions.insert(faction.to_lowercase(), disposition);
    }

    /// Read view of the disposition table, for persistence.
    pub fn dispositions(&self) -> &BTreeMap<Id, i32> {
        &self.dispositions
    }

    /// This character's faction's disposition toward `other`. Members of the
    /// same faction always read 100; unlisted factions read 0.
    pub fn disposition_towards(&self, other: &Character) -> i32 {
        if self.faction == other.faction {
            return 100;
        }
        self.dispositions.get(&other.faction).copied().unwrap_or(0)
    }

    /// Full legality check for placing `item` into `kind` at `slot`.
    ///
    /// For the equipped bag this runs, in order: the combat lock, physical
    /// slot membership, the two-handed hand conflict, the item's equip rule,
    /// and finally the container capacity check. Quick-use slots only take
    /// usable items. Backpack and merchant placement only consult capacity.
    pub fn can_add_to(&self, kind: BagKind, slot: Option<u32>, item: &Item) -> Acceptance {
        match kind {
            BagKind::Equipped => self.can_equip_at(slot, item),
            BagKind::QuickUse => {
                if item.is_usable() {
                    self.can_add_item(item)
                } else {
                    Acceptance::deny(format!("{} has no quick use", item.name))
                }
            },
            BagKind::Backpack | BagKind::Merchant => self.can_add_item(item),
        }
    }

    /// Whether the equipped `item` may come off right now.
    pub fn can_unequip(&self, item: &Item) -> Acceptance {
        if item.kind.combat_restricted() && self.combat == CombatState::Fighting {
            return Acceptance::deny(format!("cannot remove {} while fighting", item.name));
        }
        Acceptance::allow(item.stack_size.max(1))
    }

    fn can_equip_at(&self, slot: Option<u32>, item: &Item) -> Acceptance {
        if item.kind.combat_restricted() && self.combat == CombatState::Fighting {
            return Acceptance::deny(format!("cannot put on {} while fighting", item.name));
        }
        let Some(slot) = slot.and_then(EquipSlot::from_index) else {
            return Acceptance::deny(format!("{} cannot be equipped there", item.name));
        };
        if !item.fits_slot(slot) {
            return Acceptance::deny(format!("{} cannot be equipped there", item.name));
        }
        if let Some(opposite) = slot.opposite_hand() {
            let other_hand = self.inventory.equipped_at(opposite);
            let blocked = if item.two_handed() {
                other_hand.is_some()
            } else {
                other_hand.is_some_and(Item::two_handed)
            };
            if blocked {
                let reason = if item.two_handed() {
                    format!("{} needs both hands free", item.name)
                } else {
                    "the other hand is holding a two-handed weapon".to_string()
                };
                return Acceptance::deny(reason);
            }
        }
        let ctx = RuleContext {
            item,
            slot: Some(slot),
            stats: &self.stats,
        };
        if !item.equip_rule.passes(&ctx) {
            return Acceptance::deny(format!("{} cannot equip {}", self.name, item.name));
        }
        self.can_add_item(item)
    }
}

impl Container for Character {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn on_item_add(&mut self, item: &Item, kind: BagKind, slot: u32, ctx: LoadContext) {
        if self.player_controlled && ctx == LoadContext::Live {
            if let Some(action) = &item.pickup_action {
                debug!("{} picked up {}, firing action '{action}'", self.name, item.name);
            }
        }
        if kind != BagKind::Equipped {
            return;
        }
        // Load, light, and model are derived state and recomputed even while
        // restoring a save; modifiers were persisted with the stat sheet.
        let grams = i64::try_from(item.stack_weight_grams()).unwrap_or(i64::MAX);
        self.stats.modify_load(grams);
        if item.light_radius > 0 {
            self.lights.insert(slot, item.light_radius);
        }
        if let Some(model) = &item.model {
            self.models.insert(slot, model.clone());
        }
        if ctx == LoadContext::Live {
            for modifier in &item.modifiers {
                self.stats.add_modifier(*modifier);
            }
            if let Some(action) = &item.equip_action {
                debug!("{} equipped {}, firing action '{action}'", self.name, item.name);
            }
        }
    }

    fn on_item_remove(&mut self, item: &Item, kind: BagKind, slot: u32) {
        if kind != BagKind::Equipped {
            return;
        }
        let grams = i64::try_from(item.stack_weight_grams()).unwrap_or(i64::MAX);
        self.stats.modify_load(-grams);
        for modifier in &item.modifiers {
            self.stats.remove_modifier(*modifier);
        }
        self.lights.remove(&slot);
        self.models.remove(&slot);
    }

    fn player_controlled(&self) -> bool {
        self.player_controlled
    }

    fn claims(&self, owner: &Owner) -> bool {
        owner.includes(&self.id, &self.faction)
    }
}

//! Item instances and their stacking rules.
//!
//! An `Item` is a runtime copy of a catalog definition plus the mutable
//! state one bag slot carries: the stack it heads, an infinite flag for
//! vendor stock, and an ownership descriptor.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Id;
use crate::owner::Owner;
use crate::rule::EquipRule;
use crate::slot::EquipSlot;
use crate::stats::Modifier;

/// One slotted item, heading a stack of `stack_size` identical units.
///
/// Definition fields (everything except `stack_size`, `infinite`, and
/// `owner`) are copied from the catalog and treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Lowercase id of the definition this was spawned from.
    pub id: Id,
    /// The display name of the item.
    pub name: String,
    /// A general description of the item.
    pub description: String,
    /// Implementation kind; drives equip defaults and pooling.
    pub kind: ItemKind,
    /// Weight of a single unit, in grams.
    pub weight_grams: u32,
    /// Base cost of a single unit before trading multipliers.
    pub base_cost: u32,
    /// Maximum units per stack; 0 means the item does not stack.
    pub max_stack: u32,
    /// Equip positions this item fits. Empty means unequippable, except
    /// weapons and shields which fall back to the hand slots.
    pub equip_slots: Vec<EquipSlot>,
    /// Stat and skill modifiers applied to the wearer while equipped.
    pub modifiers: Vec<Modifier>,
    /// Rule gating equip attempts.
    pub equip_rule: EquipRule,
    /// Scripted action id fired on equip, resolved by the host game.
    pub equip_action: Option<Id>,
    /// Rule gating pickup attempts.
    pub pickup_rule: EquipRule,
    /// Scripted action id fired on pickup, resolved by the host game.
    pub pickup_action: Option<Id>,
    /// Radius of emitted light in tiles; 0 emits none.
    pub light_radius: u32,
    /// Visual model attached to the wearer while equipped.
    pub model: Option<String>,
    /// Units in this stack, this item included. Always at least 1; an
    /// infinite item reports 1.
    pub stack_size: u32,
    /// Vendor stock flag: removals yield fresh units and never shrink
    /// the stack.
    pub infinite: bool,
    /// Who may claim this stack.
    pub owner: Owner,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            id: Id::new(),
            name: String::new(),
            description: String::new(),
            kind: ItemKind::Simple,
            weight_grams: 0,
            base_cost: 0,
            max_stack: 0,
            equip_slots: Vec::new(),
            modifiers: Vec::new(),
            equip_rule: EquipRule::default(),
            equip_action: None,
            pickup_rule: EquipRule::default(),
            pickup_action: None,
            light_radius: 0,
            model: None,
            stack_size: 1,
            infinite: false,
            owner: Owner::unclaimed(),
        }
    }
}

impl Item {
    /// Ids compare case-insensitively everywhere.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }

    pub fn stackable(&self) -> bool {
        self.max_stack > 0
    }

    pub fn two_handed(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon { two_handed: true })
    }

    /// Pooled categories disappear into a party's counters instead of
    /// occupying bag slots.
    pub fn is_group_held(&self) -> bool {
        self.kind.pooled()
    }

    /// Only usable items may sit in quick-use slots.
    pub fn is_usable(&self) -> bool {
        matches!(self.kind, ItemKind::Usable)
    }

    /// Whether this item may occupy the given equip position.
    pub fn fits_slot(&self, slot: EquipSlot) -> bool {
        if self.equip_slots.is_empty() {
            self.kind.defaults_to_hands() && slot.is_hand()
        } else {
            self.equip_slots.contains(&slot)
        }
    }

    /// True when the incoming stack may merge into this one: same
    /// definition, same owner, and enough capacity for both (infinite
    /// stacks absorb anything).
    pub fn can_stack_with(&self, incoming: &Item) -> bool {
        self.matches_id(&incoming.id)
            && self.owner == incoming.owner
            && (self.infinite || self.max_stack >= self.stack_size + incoming.stack_size)
    }

    /// A single unit copied from this stack: definition fields and owner
    /// carried over, stack size 1, never infinite.
    pub fn fresh_unit(&self) -> Item {
        Item {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            weight_grams: self.weight_grams,
            base_cost: self.base_cost,
            max_stack: self.max_stack,
            equip_slots: self.equip_slots.clone(),
            modifiers: self.modifiers.clone(),
            equip_rule: self.equip_rule.clone(),
            equip_action: self.equip_action.clone(),
            pickup_rule: self.pickup_rule.clone(),
            pickup_action: self.pickup_action.clone(),
            light_radius: self.light_radius,
            model: self.model.clone(),
            stack_size: 1,
            infinite: false,
            owner: self.owner.clone(),
        }
    }

    /// Weight of the whole stack in grams.
    pub fn stack_weight_grams(&self) -> u64 {
        u64::from(self.weight_grams) * u64::from(self.stack_size)
    }

    /// Raw cost of the whole stack before any trading multiplier.
    pub fn stack_cost(&self) -> u64 {
        u64::from(self.base_cost) * u64::from(self.stack_size)
    }
}

/// Implementation kinds a catalog record may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Simple,
    Weapon { two_handed: bool },
    Armor,
    Shield,
    Usable,
    Currency,
    Water,
    Rations,
}

impl ItemKind {
    /// Categories a party pools into scalar counters.
    pub fn pooled(self) -> bool {
        matches!(self, ItemKind::Currency | ItemKind::Water | ItemKind::Rations)
    }

    /// Kinds that equip to the hands when their record declares no
    /// slots.
    pub fn defaults_to_hands(self) -> bool {
        matches!(self, ItemKind::Weapon { .. } | ItemKind::Shield)
    }

    /// Kinds that cannot be equipped or unequipped mid-combat. Shields
    /// are deliberately exempt.
    pub fn combat_restricted(self) -> bool {
        matches!(self, ItemKind::Armor)
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Simple => write!(f, "simple"),
            ItemKind::Weapon { .. } => write!(f, "weapon"),
            ItemKind::Armor => write!(f, "armor"),
            ItemKind::Shield => write!(f, "shield"),
            ItemKind::Usable => write!(f, "usable"),
            ItemKind::Currency => write!(f, "currency"),
            ItemKind::Water => write!(f, "water"),
            ItemKind::Rations => write!(f, "rations"),
        }
    }
}

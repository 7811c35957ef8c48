//! Party Module
//!
//! The traveling party pools gold, water, and rations instead of tracking
//! them as discrete items. Anything of a pooled kind added to the party is
//! converted into its counter and the item itself is discarded. Water and rations are capped by the summed
//! carrying limits of the party's active members; gold has no cap. The
//! party also keeps a shared junk bag for loot nobody has claimed yet.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::container::Container;
use crate::inventory::{Acceptance, Inventory, LoadContext};
use crate::item::{Item, ItemKind};
use crate::owner::Owner;
use crate::slot::BagKind;

/// Pooled counters, persisted as plain scalars rather than items.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplies {
    pub gold: u64,
    pub water: f32,
    pub rations: f32,
}

/// The player's party: members, pooled supplies, and the shared junk bag.
#[derive(Debug, Default)]
pub struct Party {
    members: Vec<Character>,
    supplies: Supplies,
    junk: Inventory,
    pub player_controlled: bool,
}

impl Party {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            supplies: Supplies::default(),
            junk: Inventory::new(),
            player_controlled: true,
        }
    }

    pub fn add_member(&mut self, character: Character) {
        self.members.push(character);
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Character] {
        &mut self.members
    }

    pub fn member(&self, id: &str) -> Option<&Character> {
        self.members.iter().find(|m| m.id.eq_ignore_ascii_case(id))
    }

    pub fn member_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.members
            .iter_mut()
            .find(|m| m.id.eq_ignore_ascii_case(id))
    }

    pub fn gold(&self) -> u64 {
        self.supplies.gold
    }

    /// Current water, re-clamped against capacity since active membership
    /// may have changed since the last mutation.
    pub fn water(&self) -> f32 {
        self.supplies.water.clamp(0.0, self.max_water())
    }

    pub fn rations(&self) -> f32 {
        self.supplies.rations.clamp(0.0, self.max_rations())
    }

    /// Water capacity summed over active members.
    pub fn max_water(&self) -> f32 {
        self.members
            .iter()
            .filter(|m| m.active)
            .map(|m| m.race.max_water)
            .sum()
    }

    /// Ration capacity summed over active members.
    pub fn max_rations(&self) -> f32 {
        self.members
            .iter()
            .filter(|m| m.active)
            .map(|m| m.race.max_rations)
            .sum()
    }

    /// Adjust the gold pool. Negative amounts spend; the pool bottoms out
    /// at zero.
    pub fn add_gold(&mut self, amount: i64) {
        self.supplies.gold = self.supplies.gold.saturating_add_signed(amount);
    }

    pub fn add_water(&mut self, amount: f32) {
        self.supplies.water = (self.supplies.water + amount).clamp(0.0, self.max_water());
    }

    pub fn add_rations(&mut self, amount: f32) {
        self.supplies.rations = (self.supplies.rations + amount).clamp(0.0, self.max_rations());
    }

    /// Overwrite the pooled counters wholesale, as when restoring a save.
    /// Callers should restore members first so the clamps see the right
    /// capacity.
    pub fn set_supplies(&mut self, supplies: Supplies) {
        self.supplies = supplies;
    }

    pub fn supplies(&self) -> &Supplies {
        &self.supplies
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn headroom(remaining: f32, stack: u32, message: &str) -> Acceptance {
        #[allow(clippy::cast_precision_loss)]
        if remaining < stack as f32 {
            Acceptance {
                allowed: remaining.max(0.0).ceil() as u32,
                message: Some(message.to_string()),
            }
        } else {
            Acceptance::allow(stack)
        }
    }
}

impl Container for Party {
    fn inventory(&self) -> &Inventory {
        &self.junk
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.junk
    }

    fn display_name(&self) -> String {
        "the party".to_string()
    }

    fn can_add_item(&self, item: &Item) -> Acceptance {
        let stack = item.stack_size.max(1);
        match item.kind {
            ItemKind::Water => Self::headroom(
                self.max_water() - self.water(),
                stack,
                "the party cannot carry any more water",
            ),
            ItemKind::Rations => Self::headroom(
                self.max_rations() - self.rations(),
                stack,
                "the party cannot carry any more rations",
            ),
            _ => Acceptance::allow(stack),
        }
    }

    fn on_item_add(&mut self, item: &Item, _kind: BagKind, _slot: u32, ctx: LoadContext) {
        if self.player_controlled && ctx == LoadContext::Live {
            if let Some(action) = &item.pickup_action {
                debug!("the party picked up {}, firing action '{action}'", item.name);
            }
        }
    }

    /// Pooled kinds are folded into their counter and never occupy a slot;
    /// everything else lands in the junk bag.
    #[allow(clippy::cast_precision_loss)]
    fn add_item(
        &mut self,
        kind: BagKind,
        item: Item,
        slot: Option<u32>,
        ctx: LoadContext,
    ) -> Option<Item> {
        let stack = item.stack_size.max(1);
        match item.kind {
            ItemKind::Currency => {
                self.add_gold(i64::from(stack));
                self.on_item_add(&item, BagKind::Backpack, 0, ctx);
                None
            },
            ItemKind::Water => {
                self.add_water(stack as f32);
                self.on_item_add(&item, BagKind::Backpack, 0, ctx);
                None
            },
            ItemKind::Rations => {
                self.add_rations(stack as f32);
                self.on_item_add(&item, BagKind::Backpack, 0, ctx);
                None
            },
            _ => {
                let incoming = item.clone();
                let placement = self.junk.place(kind, item, slot);
                if let Some(displaced) = &placement.displaced {
                    self.on_item_remove(displaced, kind, placement.slot);
                }
                self.on_item_add(&incoming, kind, placement.slot, ctx);
                placement.displaced
            },
        }
    }

    fn player_controlled(&self) -> bool {
        self.player_controlled
    }

    fn claims(&self, owner: &Owner) -> bool {
        self.members.iter().any(|m| Container::claims(m, owner))
    }
}

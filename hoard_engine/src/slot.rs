//! Bag and equip-slot vocabulary shared by every container.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use variantly::Variantly;

/// The four slot-indexed collections every inventory owns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Variantly)]
#[serde(rename_all = "camelCase")]
pub enum BagKind {
    QuickUse,
    Backpack,
    Equipped,
    Merchant,
}

impl BagKind {
    pub const ALL: [BagKind; 4] = [
        BagKind::QuickUse,
        BagKind::Backpack,
        BagKind::Equipped,
        BagKind::Merchant,
    ];
}

impl Display for BagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BagKind::QuickUse => write!(f, "quick-use"),
            BagKind::Backpack => write!(f, "backpack"),
            BagKind::Equipped => write!(f, "equipped"),
            BagKind::Merchant => write!(f, "merchant"),
        }
    }
}

/// Body-part positions backing the equipped bag.
///
/// Each position has a fixed slot index, so equipped bags can be stored
/// and persisted exactly like the other bags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlot {
    Head,
    Torso,
    Legs,
    Feet,
    Arms,
    LeftHand,
    RightHand,
    LeftRing,
    RightRing,
    Amulet,
    Belt,
    Cloak,
}

impl EquipSlot {
    /// Default slots for weapons and shields that declare none.
    pub const HAND_SLOTS: [EquipSlot; 2] = [EquipSlot::LeftHand, EquipSlot::RightHand];

    pub const ALL: [EquipSlot; 12] = [
        EquipSlot::Head,
        EquipSlot::Torso,
        EquipSlot::Legs,
        EquipSlot::Feet,
        EquipSlot::Arms,
        EquipSlot::LeftHand,
        EquipSlot::RightHand,
        EquipSlot::LeftRing,
        EquipSlot::RightRing,
        EquipSlot::Amulet,
        EquipSlot::Belt,
        EquipSlot::Cloak,
    ];

    /// Fixed index of this position within the equipped bag.
    pub fn index(self) -> u32 {
        match self {
            EquipSlot::Head => 1,
            EquipSlot::Torso => 2,
            EquipSlot::Legs => 3,
            EquipSlot::Feet => 4,
            EquipSlot::Arms => 5,
            EquipSlot::LeftHand => 6,
            EquipSlot::RightHand => 7,
            EquipSlot::LeftRing => 8,
            EquipSlot::RightRing => 9,
            EquipSlot::Amulet => 10,
            EquipSlot::Belt => 11,
            EquipSlot::Cloak => 12,
        }
    }

    /// Reverse of [`EquipSlot::index`]; `None` for indices outside 1..=12.
    pub fn from_index(index: u32) -> Option<EquipSlot> {
        EquipSlot::ALL.into_iter().find(|slot| slot.index() == index)
    }

    pub fn is_hand(self) -> bool {
        matches!(self, EquipSlot::LeftHand | EquipSlot::RightHand)
    }

    /// The other hand, for two-handed conflict checks.
    pub fn opposite_hand(self) -> Option<EquipSlot> {
        match self {
            EquipSlot::LeftHand => Some(EquipSlot::RightHand),
            EquipSlot::RightHand => Some(EquipSlot::LeftHand),
            _ => None,
        }
    }
}

impl Display for EquipSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipSlot::Head => write!(f, "head"),
            EquipSlot::Torso => write!(f, "torso"),
            EquipSlot::Legs => write!(f, "legs"),
            EquipSlot::Feet => write!(f, "feet"),
            EquipSlot::Arms => write!(f, "arms"),
            EquipSlot::LeftHand => write!(f, "left hand"),
            EquipSlot::RightHand => write!(f, "right hand"),
            EquipSlot::LeftRing => write!(f, "left ring"),
            EquipSlot::RightRing => write!(f, "right ring"),
            EquipSlot::Amulet => write!(f, "amulet"),
            EquipSlot::Belt => write!(f, "belt"),
            EquipSlot::Cloak => write!(f, "cloak"),
        }
    }
}

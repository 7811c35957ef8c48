use serde::{Deserialize, Serialize};

/// Stable identifier used across catalog references.
pub type Id = String;

/// Attribute names an equip rule or modifier may target.
pub const ATTRIBUTE_NAMES: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intellect",
    "perception",
    "willpower",
];

/// Skill names an equip rule or modifier may target.
pub const SKILL_NAMES: [&str; 8] = [
    "melee",
    "ranged",
    "dodge",
    "armor",
    "sneaking",
    "lockpicking",
    "persuasion",
    "survival",
];

/// Top-level item catalog assembled by the engine at load time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogDef {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub groups: Vec<ItemGroupDef>,
    #[serde(default)]
    pub fragments: Vec<FragmentDef>,
}

/// Item definition, one record file per item.
///
/// The id is normally derived from the record's file name; a record that
/// spells it out anyway must agree with the file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub kind: ItemKindDef,
    pub weight_grams: u32,
    pub base_cost: u32,
    /// Maximum units per stack; 0 means the item does not stack.
    #[serde(default)]
    pub max_stack: u32,
    /// Empty means unequippable, except weapons and shields which fall
    /// back to the hand slots.
    #[serde(default)]
    pub equip_slots: Vec<EquipSlotDef>,
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
    #[serde(default)]
    pub on_equip: Option<HookDef>,
    #[serde(default)]
    pub on_pickup: Option<HookDef>,
    /// Radius of emitted light in tiles; 0 emits none.
    #[serde(default)]
    pub light_radius: u32,
    /// Visual model attached to the wearer while equipped.
    #[serde(default)]
    pub model: Option<String>,
    /// Fragment records whose modifiers and equip rule this item inherits.
    #[serde(default)]
    pub imports: Vec<Id>,
}

/// Implementation kind declared by an item record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKindDef {
    Simple,
    Weapon {
        #[serde(default)]
        two_handed: bool,
    },
    Armor,
    Shield,
    Usable,
    Currency,
    Water,
    Rations,
}

impl Default for ItemKindDef {
    fn default() -> Self {
        ItemKindDef::Simple
    }
}

/// Body-part positions an item may be equipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlotDef {
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

/// Flat bonus or penalty applied to an attribute or skill while equipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierDef {
    /// One of [`ATTRIBUTE_NAMES`] or [`SKILL_NAMES`].
    pub target: String,
    pub amount: i32,
}

/// Optional rule plus scripted action attached to equip or pickup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookDef {
    #[serde(default)]
    pub rule: RuleExpr,
    #[serde(default)]
    pub action: Option<Id>,
}

/// Boolean expression tree gating equip and pickup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleExpr {
    All(Vec<RuleExpr>),
    Any(Vec<RuleExpr>),
    Pred(RulePredDef),
}

impl Default for RuleExpr {
    fn default() -> Self {
        RuleExpr::All(Vec::new())
    }
}

/// Leaf predicates used by RuleExpr.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RulePredDef {
    MinAttribute { attribute: String, min: u32 },
    MinSkill { skill: String, min: u32 },
    MinLevel { level: u32 },
}

/// Named pool of item ids drawn from at random when an inventory entry
/// references the group instead of a single item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemGroupDef {
    pub id: Id,
    #[serde(default)]
    pub members: Vec<Id>,
}

/// Shared record fragment merged into any item that imports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentDef {
    pub id: Id,
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
    #[serde(default)]
    pub equip_rule: RuleExpr,
}

/// Authored or persisted contents of one container's bags.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InventorySeedDef {
    #[serde(default)]
    pub quick_use: Vec<SlotEntryDef>,
    #[serde(default)]
    pub backpack: Vec<SlotEntryDef>,
    #[serde(default)]
    pub equipped: Vec<SlotEntryDef>,
    #[serde(default)]
    pub merchant: Vec<SlotEntryDef>,
}

/// One bag entry: what to spawn, where, how many, and for whom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotEntryDef {
    pub item: ItemRefDef,
    /// Explicit slot index; absent means first free slot.
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(default)]
    pub stack: StackSizeDef,
    #[serde(default)]
    pub owner: OwnerDef,
}

/// Reference to a concrete item id or to a group drawn at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemRefDef {
    Item(Id),
    Group(Id),
}

/// Stack size authored exactly, as a uniform random range, or infinite
/// for vendor stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StackSizeDef {
    Exact(u32),
    Range { min: u32, max: u32 },
    Infinite,
}

impl Default for StackSizeDef {
    fn default() -> Self {
        StackSizeDef::Exact(1)
    }
}

/// Persisted form of an item's owner descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDef {
    #[serde(default)]
    pub character: Option<Id>,
    #[serde(default)]
    pub faction: Option<Id>,
    #[serde(default)]
    pub fixed: bool,
}

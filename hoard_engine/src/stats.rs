//! Stats Module
//!
//! Attributes, skills, and the modifier bookkeeping that equipment
//! drives. Inventory calls in here; nothing here calls back.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Innate attributes every character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intellect,
    Perception,
    Willpower,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Intellect,
        Attribute::Perception,
        Attribute::Willpower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Strength => "strength",
            Attribute::Dexterity => "dexterity",
            Attribute::Constitution => "constitution",
            Attribute::Intellect => "intellect",
            Attribute::Perception => "perception",
            Attribute::Willpower => "willpower",
        }
    }

    pub fn from_name(name: &str) -> Option<Attribute> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(name))
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Learned skills, ranked from zero upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Skill {
    Melee,
    Ranged,
    Dodge,
    Armor,
    Sneaking,
    Lockpicking,
    Persuasion,
    Survival,
}

impl Skill {
    pub const ALL: [Skill; 8] = [
        Skill::Melee,
        Skill::Ranged,
        Skill::Dodge,
        Skill::Armor,
        Skill::Sneaking,
        Skill::Lockpicking,
        Skill::Persuasion,
        Skill::Survival,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Melee => "melee",
            Skill::Ranged => "ranged",
            Skill::Dodge => "dodge",
            Skill::Armor => "armor",
            Skill::Sneaking => "sneaking",
            Skill::Lockpicking => "lockpicking",
            Skill::Persuasion => "persuasion",
            Skill::Survival => "survival",
        }
    }

    pub fn from_name(name: &str) -> Option<Skill> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(name))
    }
}

impl Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What an equipment modifier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierTarget {
    Attribute(Attribute),
    Skill(Skill),
}

impl ModifierTarget {
    /// Resolve a catalog target name to a typed target.
    pub fn from_name(name: &str) -> Option<ModifierTarget> {
        Attribute::from_name(name)
            .map(ModifierTarget::Attribute)
            .or_else(|| Skill::from_name(name).map(ModifierTarget::Skill))
    }
}

impl Display for ModifierTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifierTarget::Attribute(attr) => write!(f, "{attr}"),
            ModifierTarget::Skill(skill) => write!(f, "{skill}"),
        }
    }
}

/// Flat bonus or penalty contributed by an equipped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub target: ModifierTarget,
    pub amount: i32,
}

/// One character's attributes, skills, level, active equipment
/// modifiers, and carried load.
///
/// Modifiers are persisted with the sheet; carried load is recomputed
/// from the bags whenever a save is restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSheet {
    attributes: BTreeMap<Attribute, u32>,
    skills: BTreeMap<Skill, u32>,
    level: u32,
    modifiers: Vec<Modifier>,
    #[serde(skip)]
    load_grams: u64,
}

impl Default for StatSheet {
    fn default() -> Self {
        StatSheet {
            attributes: BTreeMap::new(),
            skills: BTreeMap::new(),
            level: 1,
            modifiers: Vec::new(),
            load_grams: 0,
        }
    }
}

impl StatSheet {
    pub fn new() -> StatSheet {
        StatSheet::default()
    }

    /// Effective attribute value, base plus active modifiers.
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        let base = i64::from(*self.attributes.get(&attribute).unwrap_or(&0));
        let modified = base + self.modifier_total(ModifierTarget::Attribute(attribute));
        i32::try_from(modified).unwrap_or(i32::MAX)
    }

    /// Effective skill rank, base plus active modifiers.
    pub fn skill_rank(&self, skill: Skill) -> i32 {
        let base = i64::from(*self.skills.get(&skill).unwrap_or(&0));
        let modified = base + self.modifier_total(ModifierTarget::Skill(skill));
        i32::try_from(modified).unwrap_or(i32::MAX)
    }

    pub fn set_attribute(&mut self, attribute: Attribute, value: u32) {
        self.attributes.insert(attribute, value);
    }

    pub fn set_skill(&mut self, skill: Skill, rank: u32) {
        self.skills.insert(skill, rank);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Remove one occurrence of the modifier, if present.
    pub fn remove_modifier(&mut self, modifier: Modifier) -> Option<Modifier> {
        if let Some(idx) = self.modifiers.iter().position(|m| *m == modifier) {
            Some(self.modifiers.remove(idx))
        } else {
            None
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Total carried weight in grams.
    pub fn load_grams(&self) -> u64 {
        self.load_grams
    }

    /// Adjust carried weight; saturates at zero on underflow.
    pub fn modify_load(&mut self, delta_grams: i64) {
        self.load_grams = self.load_grams.saturating_add_signed(delta_grams);
    }

    fn modifier_total(&self, target: ModifierTarget) -> i64 {
        self.modifiers
            .iter()
            .filter(|m| m.target == target)
            .map(|m| i64::from(m.amount))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_shift_attributes_and_skills() {
        let mut stats = StatSheet::new();
        stats.set_attribute(Attribute::Strength, 10);
        stats.set_skill(Skill::Melee, 3);

        stats.add_modifier(Modifier {
            target: ModifierTarget::Attribute(Attribute::Strength),
            amount: 2,
        });
        stats.add_modifier(Modifier {
            target: ModifierTarget::Skill(Skill::Melee),
            amount: -1,
        });

        assert_eq!(stats.attribute(Attribute::Strength), 12);
        assert_eq!(stats.skill_rank(Skill::Melee), 2);
        assert_eq!(stats.attribute(Attribute::Dexterity), 0);
    }

    #[test]
    fn remove_modifier_takes_one_occurrence() {
        let mut stats = StatSheet::new();
        let bonus = Modifier {
            target: ModifierTarget::Skill(Skill::Dodge),
            amount: 1,
        };
        stats.add_modifier(bonus);
        stats.add_modifier(bonus);

        assert!(stats.remove_modifier(bonus).is_some());
        assert_eq!(stats.skill_rank(Skill::Dodge), 1);
        assert!(stats.remove_modifier(bonus).is_some());
        assert!(stats.remove_modifier(bonus).is_none());
    }

    #[test]
    fn load_saturates_at_zero() {
        let mut stats = StatSheet::new();
        stats.modify_load(500);
        stats.modify_load(-800);
        assert_eq!(stats.load_grams(), 0);
    }

    #[test]
    fn stat_names_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
        }
        for skill in Skill::ALL {
            assert_eq!(Skill::from_name(skill.name()), Some(skill));
        }
        assert_eq!(Attribute::from_name("charisma"), None);
    }

    #[test]
    fn catalog_stat_names_resolve() {
        for name in hoard_data::ATTRIBUTE_NAMES {
            assert!(matches!(
                ModifierTarget::from_name(name),
                Some(ModifierTarget::Attribute(_))
            ));
        }
        for name in hoard_data::SKILL_NAMES {
            assert!(matches!(ModifierTarget::from_name(name), Some(ModifierTarget::Skill(_))));
        }
    }
}

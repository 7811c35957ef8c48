//! Equip and pickup rules.
//!
//! Small serializable expression trees evaluated against a typed
//! context, so legality stays auditable without a scripting engine.

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::slot::EquipSlot;
use crate::stats::{Attribute, Skill, StatSheet};

/// What a rule may inspect when it runs.
pub struct RuleContext<'a> {
    pub item: &'a Item,
    pub slot: Option<EquipSlot>,
    pub stats: &'a StatSheet,
}

/// Boolean expression tree gating equip or pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EquipRule {
    All(Vec<EquipRule>),
    Any(Vec<EquipRule>),
    Pred(EquipPred),
}

impl Default for EquipRule {
    fn default() -> Self {
        EquipRule::All(Vec::new())
    }
}

impl EquipRule {
    /// Evaluate the tree. An empty `All` always passes; an empty `Any`
    /// never does.
    pub fn passes(&self, ctx: &RuleContext<'_>) -> bool {
        match self {
            EquipRule::All(kids) => kids.iter().all(|kid| kid.passes(ctx)),
            EquipRule::Any(kids) => kids.iter().any(|kid| kid.passes(ctx)),
            EquipRule::Pred(pred) => pred.passes(ctx),
        }
    }
}

/// Leaf predicates evaluated against the prospective wearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipPred {
    MinAttribute { attribute: Attribute, min: u32 },
    MinSkill { skill: Skill, min: u32 },
    MinLevel { level: u32 },
}

impl EquipPred {
    pub fn passes(&self, ctx: &RuleContext<'_>) -> bool {
        match self {
            EquipPred::MinAttribute { attribute, min } => {
                ctx.stats.attribute(*attribute) >= i32::try_from(*min).unwrap_or(i32::MAX)
            },
            EquipPred::MinSkill { skill, min } => {
                ctx.stats.skill_rank(*skill) >= i32::try_from(*min).unwrap_or(i32::MAX)
            },
            EquipPred::MinLevel { level } => ctx.stats.level() >= *level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn context<'a>(item: &'a Item, stats: &'a StatSheet) -> RuleContext<'a> {
        RuleContext {
            item,
            slot: Some(EquipSlot::RightHand),
            stats,
        }
    }

    #[test]
    fn empty_all_passes_and_empty_any_fails() {
        let item = Item::default();
        let stats = StatSheet::new();
        assert!(EquipRule::All(Vec::new()).passes(&context(&item, &stats)));
        assert!(!EquipRule::Any(Vec::new()).passes(&context(&item, &stats)));
    }

    #[test]
    fn min_attribute_gates_on_effective_value() {
        let item = Item::default();
        let mut stats = StatSheet::new();
        stats.set_attribute(Attribute::Strength, 7);

        let rule = EquipRule::Pred(EquipPred::MinAttribute {
            attribute: Attribute::Strength,
            min: 8,
        });
        assert!(!rule.passes(&context(&item, &stats)));

        stats.set_attribute(Attribute::Strength, 8);
        assert!(rule.passes(&context(&item, &stats)));
    }

    #[test]
    fn nested_trees_combine() {
        let item = Item::default();
        let mut stats = StatSheet::new();
        stats.set_skill(Skill::Melee, 4);
        stats.set_level(3);

        let rule = EquipRule::All(vec![
            EquipRule::Pred(EquipPred::MinLevel { level: 2 }),
            EquipRule::Any(vec![
                EquipRule::Pred(EquipPred::MinSkill {
                    skill: Skill::Melee,
                    min: 5,
                }),
                EquipRule::Pred(EquipPred::MinSkill {
                    skill: Skill::Melee,
                    min: 3,
                }),
            ]),
        ]);
        assert!(rule.passes(&context(&item, &stats)));
    }
}

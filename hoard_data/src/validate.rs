use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a CatalogDef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a CatalogDef.
///
/// Ids compare case-insensitively throughout.
///
/// ```
/// use hoard_data::{CatalogDef, ItemDef, ItemKindDef, validate_catalog};
///
/// let catalog = CatalogDef {
///     items: vec![ItemDef {
///         id: "lantern".into(),
///         name: "Lantern".into(),
///         desc: "A dented brass lantern.".into(),
///         kind: ItemKindDef::Simple,
///         weight_grams: 900,
///         base_cost: 12,
///         max_stack: 0,
///         equip_slots: Vec::new(),
///         modifiers: Vec::new(),
///         on_equip: None,
///         on_pickup: None,
///         light_radius: 4,
///         model: None,
///         imports: Vec::new(),
///     }],
///     ..CatalogDef::default()
/// };
/// assert!(validate_catalog(&catalog).is_empty());
/// ```
pub fn validate_catalog(catalog: &CatalogDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut items = HashSet::new();
    let mut groups = HashSet::new();
    let mut fragments = HashSet::new();

    track_ids(
        "item",
        catalog.items.iter().map(|i| i.id.as_str()),
        &mut items,
        &mut errors,
    );
    track_ids(
        "item group",
        catalog.groups.iter().map(|g| g.id.as_str()),
        &mut groups,
        &mut errors,
    );
    track_ids(
        "fragment",
        catalog.fragments.iter().map(|f| f.id.as_str()),
        &mut fragments,
        &mut errors,
    );

    // Store ID sets once so we can check cross-references cheaply.
    let ids = IdSets {
        items: &items,
        fragments: &fragments,
    };

    for item in &catalog.items {
        let context = format!("item '{}'", item.id);
        if item.name.trim().is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} has no name"),
            });
        }
        if pooled(item.kind) {
            if item.weight_grams == 0 {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} is pooled but has zero weight"),
                });
            }
            if item.max_stack == 0 {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} is pooled but does not stack"),
                });
            }
            if !item.equip_slots.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} is pooled but declares equip slots"),
                });
            }
        }
        if matches!(item.kind, ItemKindDef::Weapon { .. })
            && item.equip_slots.iter().any(|slot| !hand_slot(*slot))
        {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} is a weapon with a non-hand equip slot"),
            });
        }
        for modifier in &item.modifiers {
            validate_modifier(modifier, &mut errors, &context);
        }
        if let Some(hook) = &item.on_equip {
            validate_rule_expr(&hook.rule, &mut errors, &format!("{context} equip rule"));
        }
        if let Some(hook) = &item.on_pickup {
            validate_rule_expr(&hook.rule, &mut errors, &format!("{context} pickup rule"));
        }
        for import in &item.imports {
            check_ref("fragment", import, ids.fragments, context.clone(), &mut errors);
        }
    }

    for group in &catalog.groups {
        let context = format!("item group '{}'", group.id);
        if group.members.is_empty() {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} has no members"),
            });
        }
        for member in &group.members {
            check_ref("item", member, ids.items, context.clone(), &mut errors);
        }
    }

    for fragment in &catalog.fragments {
        let context = format!("fragment '{}'", fragment.id);
        for modifier in &fragment.modifiers {
            validate_modifier(modifier, &mut errors, &context);
        }
        validate_rule_expr(&fragment.equip_rule, &mut errors, &format!("{context} equip rule"));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ItemDef {
        ItemDef {
            id: id.to_string(),
            name: format!("Item {id}"),
            desc: "Test item".into(),
            kind: ItemKindDef::Simple,
            weight_grams: 100,
            base_cost: 5,
            max_stack: 0,
            equip_slots: Vec::new(),
            modifiers: Vec::new(),
            on_equip: None,
            on_pickup: None,
            light_radius: 0,
            model: None,
            imports: Vec::new(),
        }
    }

    fn catalog_with_items(items: Vec<ItemDef>) -> CatalogDef {
        CatalogDef {
            items,
            ..CatalogDef::default()
        }
    }

    #[test]
    fn duplicate_ids_are_reported_case_insensitively() {
        let catalog = catalog_with_items(vec![item("gold"), item("Gold")]);

        let errors = validate_catalog(&catalog);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::DuplicateId { kind, id } if *kind == "item" && id == "gold"))
        );
    }

    #[test]
    fn unknown_group_members_are_reported() {
        let mut catalog = catalog_with_items(vec![item("dagger")]);
        catalog.groups = vec![ItemGroupDef {
            id: "blades".into(),
            members: vec!["dagger".into(), "katana".into()],
        }];

        let errors = validate_catalog(&catalog);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "item" && id == "katana")));
    }

    #[test]
    fn empty_groups_are_reported() {
        let mut catalog = catalog_with_items(vec![item("dagger")]);
        catalog.groups = vec![ItemGroupDef {
            id: "blades".into(),
            members: Vec::new(),
        }];

        let errors = validate_catalog(&catalog);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("no members")))
        );
    }

    #[test]
    fn pooled_items_must_stack_and_weigh_something() {
        let mut gold = item("gold");
        gold.kind = ItemKindDef::Currency;
        gold.weight_grams = 0;
        gold.max_stack = 0;
        let catalog = catalog_with_items(vec![gold]);

        let errors = validate_catalog(&catalog);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("zero weight")))
        );
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("does not stack")))
        );
    }

    #[test]
    fn unknown_rule_attributes_are_reported() {
        let mut helm = item("helm");
        helm.on_equip = Some(HookDef {
            rule: RuleExpr::Pred(RulePredDef::MinAttribute {
                attribute: "charisma".into(),
                min: 3,
            }),
            action: None,
        });
        let catalog = catalog_with_items(vec![helm]);

        let errors = validate_catalog(&catalog);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "attribute" && id == "charisma")));
    }

    #[test]
    fn weapons_may_only_declare_hand_slots() {
        let mut sword = item("sword");
        sword.kind = ItemKindDef::Weapon { two_handed: false };
        sword.equip_slots = vec![EquipSlotDef::Torso];
        let catalog = catalog_with_items(vec![sword]);

        let errors = validate_catalog(&catalog);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("non-hand")))
        );
    }

    #[test]
    fn unknown_modifier_targets_are_reported() {
        let mut ring = item("ring");
        ring.modifiers = vec![ModifierDef {
            target: "luck".into(),
            amount: 1,
        }];
        let catalog = catalog_with_items(vec![ring]);

        let errors = validate_catalog(&catalog);
        assert!(errors.iter().any(|err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "stat" && id == "luck")));
    }
}

struct IdSets<'a> {
    items: &'a HashSet<String>,
    fragments: &'a HashSet<String>,
}

fn pooled(kind: ItemKindDef) -> bool {
    matches!(
        kind,
        ItemKindDef::Currency | ItemKindDef::Water | ItemKindDef::Rations
    )
}

fn hand_slot(slot: EquipSlotDef) -> bool {
    matches!(slot, EquipSlotDef::LeftHand | EquipSlotDef::RightHand)
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !set.insert(id.to_lowercase()) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_lowercase(),
            });
        }
    }
}

fn check_ref(kind: &'static str, id: &str, set: &HashSet<String>, context: String, errors: &mut Vec<ValidationError>) {
    if !set.contains(&id.to_lowercase()) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

fn validate_modifier(modifier: &ModifierDef, errors: &mut Vec<ValidationError>, context: &str) {
    let target = modifier.target.as_str();
    if !ATTRIBUTE_NAMES.contains(&target) && !SKILL_NAMES.contains(&target) {
        errors.push(ValidationError::MissingReference {
            kind: "stat",
            id: target.to_string(),
            context: format!("{context} modifier"),
        });
    }
    if modifier.amount == 0 {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context} modifier on '{target}' does nothing"),
        });
    }
}

fn validate_rule_expr(expr: &RuleExpr, errors: &mut Vec<ValidationError>, context: &str) {
    match expr {
        RuleExpr::All(kids) | RuleExpr::Any(kids) => {
            for kid in kids {
                validate_rule_expr(kid, errors, context);
            }
        },
        RuleExpr::Pred(pred) => {
            validate_rule_pred(pred, errors, context);
        },
    }
}

fn validate_rule_pred(pred: &RulePredDef, errors: &mut Vec<ValidationError>, context: &str) {
    match pred {
        RulePredDef::MinAttribute { attribute, min: _ } => {
            if !ATTRIBUTE_NAMES.contains(&attribute.as_str()) {
                errors.push(ValidationError::MissingReference {
                    kind: "attribute",
                    id: attribute.clone(),
                    context: context.to_string(),
                });
            }
        },
        RulePredDef::MinSkill { skill, min: _ } => {
            if !SKILL_NAMES.contains(&skill.as_str()) {
                errors.push(ValidationError::MissingReference {
                    kind: "skill",
                    id: skill.clone(),
                    context: context.to_string(),
                });
            }
        },
        RulePredDef::MinLevel { level } => {
            if *level == 0 {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context}: min level 0 is always met"),
                });
            }
        },
    }
}

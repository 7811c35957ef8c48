//! Item record loader and conversion helpers.
//!
//! Converts the serialized catalog data model into runtime engine structs.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use hoard_data::{
    CatalogDef, EquipSlotDef, FragmentDef, ItemDef, ItemGroupDef, ItemKindDef, ModifierDef,
    RuleExpr, RulePredDef,
};
use log::debug;

use crate::catalog::Catalog;
use crate::item::{Item, ItemKind};
use crate::owner::Owner;
use crate::rule::{EquipPred, EquipRule};
use crate::slot::EquipSlot;
use crate::stats::{Attribute, Modifier, ModifierTarget, Skill};

/// Read every item record under `items_dir` plus the optional group and
/// fragment files into one [`CatalogDef`].
pub fn load_catalog_def(
    items_dir: &Path,
    groups_path: &Path,
    fragments_path: &Path,
) -> Result<CatalogDef> {
    Ok(CatalogDef {
        items: load_item_defs(items_dir)?,
        groups: load_group_defs(groups_path)?,
        fragments: load_fragment_defs(fragments_path)?,
    })
}

/// Load item records, one RON file per item, in filename order. A record's
/// id is derived from its filename; a record that declares a conflicting id
/// is rejected.
pub fn load_item_defs(items_dir: &Path) -> Result<Vec<ItemDef>> {
    let entries = fs::read_dir(items_dir)
        .with_context(|| format!("reading item records from '{}'", items_dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("reading item records from '{}'", items_dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "ron") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut defs = Vec::with_capacity(paths.len());
    for path in &paths {
        defs.push(load_item_def(path)?);
    }
    Ok(defs)
}

fn load_item_def(path: &Path) -> Result<ItemDef> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("item record '{}' has no usable filename", path.display()))?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading item record '{}'", path.display()))?;
    let mut def: ItemDef =
        ron::from_str(&text).with_context(|| format!("parsing item record '{}'", path.display()))?;
    if def.id.is_empty() {
        def.id = stem.to_lowercase();
    } else if def.id.eq_ignore_ascii_case(stem) {
        def.id = def.id.to_lowercase();
    } else {
        bail!(
            "item record '{}' declares id '{}', which does not match its filename",
            path.display(),
            def.id
        );
    }
    Ok(def)
}

/// Load the optional named-groups file.
pub fn load_group_defs(path: &Path) -> Result<Vec<ItemGroupDef>> {
    if !path.exists() {
        debug!("no item group file at '{}'", path.display());
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading item groups from '{}'", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing item groups from '{}'", path.display()))
}

/// Load the optional shared-fragments file.
pub fn load_fragment_defs(path: &Path) -> Result<Vec<FragmentDef>> {
    if !path.exists() {
        debug!("no fragment file at '{}'", path.display());
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading fragments from '{}'", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing fragments from '{}'", path.display()))
}

/// Convert a validated [`CatalogDef`] into a runtime [`Catalog`].
pub fn build_catalog_from_def(def: &CatalogDef) -> Result<Catalog> {
    let fragments: HashMap<String, &FragmentDef> = def
        .fragments
        .iter()
        .map(|fragment| (fragment.id.to_lowercase(), fragment))
        .collect();

    let mut catalog = Catalog::new();
    for item_def in &def.items {
        let item = item_from_def(item_def, &fragments)
            .with_context(|| format!("while building item '{}'", item_def.id))?;
        catalog.insert_template(item);
    }
    for group in &def.groups {
        let members = group.members.iter().map(|id| id.to_lowercase()).collect();
        catalog.insert_group(&group.id, members);
    }
    Ok(catalog)
}

fn item_from_def(def: &ItemDef, fragments: &HashMap<String, &FragmentDef>) -> Result<Item> {
    let mut modifiers = def
        .modifiers
        .iter()
        .map(modifier_from_def)
        .collect::<Result<Vec<_>>>()?;

    let mut equip_rules = Vec::new();
    let mut equip_action = None;
    if let Some(hook) = &def.on_equip {
        if !is_vacuous(&hook.rule) {
            equip_rules.push(rule_from_def(&hook.rule)?);
        }
        equip_action = hook.action.clone();
    }

    let mut pickup_rule = EquipRule::default();
    let mut pickup_action = None;
    if let Some(hook) = &def.on_pickup {
        if !is_vacuous(&hook.rule) {
            pickup_rule = rule_from_def(&hook.rule)?;
        }
        pickup_action = hook.action.clone();
    }

    for import in &def.imports {
        let fragment = fragments
            .get(&import.to_lowercase())
            .ok_or_else(|| anyhow!("unknown fragment '{import}'"))?;
        for modifier in &fragment.modifiers {
            modifiers.push(modifier_from_def(modifier)?);
        }
        if !is_vacuous(&fragment.equip_rule) {
            equip_rules.push(rule_from_def(&fragment.equip_rule)?);
        }
    }

    let equip_rule = match equip_rules.len() {
        0 => EquipRule::default(),
        1 => equip_rules.remove(0),
        _ => EquipRule::All(equip_rules),
    };

    Ok(Item {
        id: def.id.to_lowercase(),
        name: def.name.clone(),
        description: def.desc.clone(),
        kind: kind_from_def(&def.kind),
        weight_grams: def.weight_grams,
        base_cost: def.base_cost,
        max_stack: def.max_stack,
        equip_slots: def.equip_slots.iter().map(slot_from_def).collect(),
        modifiers,
        equip_rule,
        equip_action,
        pickup_rule,
        pickup_action,
        light_radius: def.light_radius,
        model: def.model.clone(),
        stack_size: 1,
        infinite: false,
        owner: Owner::unclaimed(),
    })
}

fn kind_from_def(def: &ItemKindDef) -> ItemKind {
    match def {
        ItemKindDef::Simple => ItemKind::Simple,
        ItemKindDef::Weapon { two_handed } => ItemKind::Weapon {
            two_handed: *two_handed,
        },
        ItemKindDef::Armor => ItemKind::Armor,
        ItemKindDef::Shield => ItemKind::Shield,
        ItemKindDef::Usable => ItemKind::Usable,
        ItemKindDef::Currency => ItemKind::Currency,
        ItemKindDef::Water => ItemKind::Water,
        ItemKindDef::Rations => ItemKind::Rations,
    }
}

fn slot_from_def(def: &EquipSlotDef) -> EquipSlot {
    match def {
        EquipSlotDef::Head => EquipSlot::Head,
        EquipSlotDef::Torso => EquipSlot::Torso,
        EquipSlotDef::Legs => EquipSlot::Legs,
        EquipSlotDef::Feet => EquipSlot::Feet,
        EquipSlotDef::Arms => EquipSlot::Arms,
        EquipSlotDef::LeftHand => EquipSlot::LeftHand,
        EquipSlotDef::RightHand => EquipSlot::RightHand,
        EquipSlotDef::LeftRing => EquipSlot::LeftRing,
        EquipSlotDef::RightRing => EquipSlot::RightRing,
        EquipSlotDef::Amulet => EquipSlot::Amulet,
        EquipSlotDef::Belt => EquipSlot::Belt,
        EquipSlotDef::Cloak => EquipSlot::Cloak,
    }
}

fn modifier_from_def(def: &ModifierDef) -> Result<Modifier> {
    let target = ModifierTarget::from_name(&def.target)
        .ok_or_else(|| anyhow!("unknown modifier target '{}'", def.target))?;
    Ok(Modifier {
        target,
        amount: def.amount,
    })
}

fn rule_from_def(def: &RuleExpr) -> Result<EquipRule> {
    Ok(match def {
        RuleExpr::All(exprs) => EquipRule::All(
            exprs
                .iter()
                .map(rule_from_def)
                .collect::<Result<Vec<_>>>()?,
        ),
        RuleExpr::Any(exprs) => EquipRule::Any(
            exprs
                .iter()
                .map(rule_from_def)
                .collect::<Result<Vec<_>>>()?,
        ),
        RuleExpr::Pred(pred) => EquipRule::Pred(pred_from_def(pred)?),
    })
}

fn pred_from_def(def: &RulePredDef) -> Result<EquipPred> {
    Ok(match def {
        RulePredDef::MinAttribute { attribute, min } => EquipPred::MinAttribute {
            attribute: Attribute::from_name(attribute)
                .ok_or_else(|| anyhow!("unknown attribute '{attribute}'"))?,
            min: *min,
        },
        RulePredDef::MinSkill { skill, min } => EquipPred::MinSkill {
            skill: Skill::from_name(skill).ok_or_else(|| anyhow!("unknown skill '{skill}'"))?,
            min: *min,
        },
        RulePredDef::MinLevel { level } => EquipPred::MinLevel { level: *level },
    })
}

/// An `All` with no members passes everything and is not worth carrying.
fn is_vacuous(rule: &RuleExpr) -> bool {
    matches!(rule, RuleExpr::All(exprs) if exprs.is_empty())
}

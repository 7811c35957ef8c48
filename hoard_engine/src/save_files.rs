//! Save-game discovery and serialization helpers.
//!
//! A save file is a [`SaveState`]: the party's supplies plus, per member,
//! the stat sheet and every bag spelled out as slot entries. Items are not
//! serialized whole; they are respawned from the catalog on restore and
//! pushed through the normal add path under [`LoadContext::RestoringSave`],
//! which rebuilds carried load, light, and models without reapplying the
//! modifiers already sitting in the persisted stat sheets.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use hoard_data::{ItemRefDef, OwnerDef, SlotEntryDef, StackSizeDef};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::character::{Character, CombatState, Race};
use crate::container::Container;
use crate::inventory::{Bag, LoadContext};
use crate::item::Item;
use crate::loader::seeds::spawn_entry;
use crate::party::{Party, Supplies};
use crate::slot::BagKind;
use crate::stats::StatSheet;
use crate::{HOARD_VERSION, Id};

pub const SAVE_DIR: &str = "saved_games";

static ACTIVE_SAVE_DIR: LazyLock<RwLock<PathBuf>> =
    LazyLock::new(|| RwLock::new(PathBuf::from(SAVE_DIR)));

/// Return the active save directory used for save operations.
pub fn active_save_dir() -> PathBuf {
    ACTIVE_SAVE_DIR
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_else(|_| PathBuf::from(SAVE_DIR))
}

/// Set the active save directory.
pub fn set_active_save_dir(path: PathBuf) {
    if let Ok(mut guard) = ACTIVE_SAVE_DIR.write() {
        *guard = path;
    }
}

/// Everything needed to rebuild a running party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    pub version: String,
    pub supplies: Supplies,
    pub members: Vec<CharacterSave>,
    /// The party's shared junk bag. Pooled categories never sit here;
    /// they live in `supplies`.
    pub junk: Vec<SlotEntryDef>,
}

/// One member's persisted slice: identity, sheet, and bag contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSave {
    pub id: Id,
    pub name: String,
    pub faction: Id,
    pub race: Race,
    pub active: bool,
    pub player_controlled: bool,
    pub combat: CombatState,
    pub stats: StatSheet,
    #[serde(default)]
    pub dispositions: BTreeMap<Id, i32>,
    #[serde(default)]
    pub quick_use: Vec<SlotEntryDef>,
    #[serde(default)]
    pub backpack: Vec<SlotEntryDef>,
    #[serde(default)]
    pub equipped: Vec<SlotEntryDef>,
    #[serde(default)]
    pub merchant: Vec<SlotEntryDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    pub slot: String,
    pub version: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub leader: String,
    pub party_size: usize,
    pub gold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFileStatus {
    Ready,
    VersionMismatch {
        save_version: String,
        current_version: String,
    },
    Corrupted {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileEntry {
    pub slot: String,
    pub version: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
    pub summary: Option<SaveSummary>,
    pub status: SaveFileStatus,
}

/// Capture a party into a serializable state.
pub fn snapshot_party(party: &Party) -> SaveState {
    SaveState {
        version: HOARD_VERSION.to_string(),
        supplies: party.supplies().clone(),
        members: party.members().iter().map(snapshot_character).collect(),
        junk: bag_entries(party.inventory().bag(BagKind::Backpack)),
    }
}

/// Rebuild a party from a saved state, respawning items from the catalog.
///
/// # Errors
/// - on saved entries referencing ids missing from the catalog
pub fn restore_party(state: &SaveState, catalog: &Catalog) -> Result<Party> {
    let mut party = Party::new();
    for member_state in &state.members {
        party.add_member(restore_character(member_state, catalog)?);
    }
    // Members first: the water and rations clamps need their capacity.
    party.set_supplies(state.supplies.clone());
    for entry in &state.junk {
        place_saved_entry(&mut party, BagKind::Backpack, entry, catalog)
            .context("while restoring the party's junk bag")?;
    }
    Ok(party)
}

fn snapshot_character(character: &Character) -> CharacterSave {
    let bags = character.inventory();
    CharacterSave {
        id: character.id.clone(),
        name: character.name.clone(),
        faction: character.faction.clone(),
        race: character.race.clone(),
        active: character.active,
        player_controlled: character.player_controlled,
        combat: character.combat,
        stats: character.stats.clone(),
        dispositions: character.dispositions().clone(),
        quick_use: bag_entries(bags.bag(BagKind::QuickUse)),
        backpack: bag_entries(bags.bag(BagKind::Backpack)),
        equipped: bag_entries(bags.bag(BagKind::Equipped)),
        merchant: bag_entries(bags.bag(BagKind::Merchant)),
    }
}

fn restore_character(save: &CharacterSave, catalog: &Catalog) -> Result<Character> {
    let mut character = Character::new(&save.id, &save.name, &save.faction);
    character.race = save.race.clone();
    character.active = save.active;
    character.player_controlled = save.player_controlled;
    character.combat = save.combat;
    character.stats = save.stats.clone();
    for (faction, disposition) in &save.dispositions {
        character.set_disposition(faction, *disposition);
    }
    let bags = [
        (BagKind::QuickUse, &save.quick_use),
        (BagKind::Backpack, &save.backpack),
        (BagKind::Equipped, &save.equipped),
        (BagKind::Merchant, &save.merchant),
    ];
    for (kind, entries) in bags {
        for entry in entries {
            place_saved_entry(&mut character, kind, entry, catalog)
                .with_context(|| format!("while restoring {}'s items", save.name))?;
        }
    }
    Ok(character)
}

fn bag_entries(bag: &Bag) -> Vec<SlotEntryDef> {
    bag.iter().map(|(slot, item)| entry_from_item(slot, item)).collect()
}

fn entry_from_item(slot: u32, item: &Item) -> SlotEntryDef {
    SlotEntryDef {
        item: ItemRefDef::Item(item.id.clone()),
        slot: Some(slot),
        stack: if item.infinite {
            StackSizeDef::Infinite
        } else {
            StackSizeDef::Exact(item.stack_size)
        },
        owner: OwnerDef::from(&item.owner),
    }
}

fn place_saved_entry(
    container: &mut dyn Container,
    kind: BagKind,
    entry: &SlotEntryDef,
    catalog: &Catalog,
) -> Result<()> {
    let item = spawn_entry(catalog, entry)?;
    container.add_item(kind, item, entry.slot, LoadContext::RestoringSave);
    Ok(())
}

/// File name a slot saves under for the current engine version.
pub fn save_file_name(slot: &str) -> String {
    format!("{slot}-hoard-{HOARD_VERSION}.ron")
}

/// Serialize a state and write it under `dir` as the named slot.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file cannot
/// be serialized or written.
pub fn write_save_file(dir: &Path, slot: &str, state: &SaveState) -> Result<PathBuf> {
    let state_ron = ron::ser::to_string(state).context("serializing save state to 'ron' format")?;
    fs::create_dir_all(dir).with_context(|| format!("creating save folder '{}'", dir.display()))?;
    let path = dir.join(save_file_name(slot));
    fs::write(&path, state_ron).with_context(|| format!("writing save file '{}'", path.display()))?;
    Ok(path)
}

/// Load a save file from disk and deserialize its state.
///
/// # Errors
/// Returns an error if the file cannot be read or deserialized.
pub fn load_save_file(path: &Path) -> Result<SaveState> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading save file {}", path.display()))?;
    ron::from_str::<SaveState>(&raw).with_context(|| format!("parsing save file {}", path.display()))
}

/// Discover save slot files stored in `dir`.
///
/// # Errors
/// Returns an error if the directory contents cannot be read or enumerated.
pub fn collect_save_slots(dir: &Path) -> Result<Vec<SaveSlot>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        if let Some(slot) = slot_from_entry(&entry) {
            slots.push(slot);
        }
    }
    slots.sort_by(|a, b| a.slot.cmp(&b.slot).then(a.version.cmp(&b.version)));
    Ok(slots)
}

/// Build descriptive entries for save files located in `dir`.
///
/// # Errors
/// Returns an error if reading the directory fails.
pub fn build_save_entries(dir: &Path) -> Result<Vec<SaveFileEntry>> {
    let slots = collect_save_slots(dir)?;
    let mut entries: Vec<_> = slots.into_iter().map(entry_for_slot).collect();
    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.slot.cmp(&b.slot)));
    Ok(entries)
}

/// Format a human-friendly modified time relative to now.
pub fn format_modified(modified: SystemTime) -> String {
    match SystemTime::now().duration_since(modified) {
        Ok(delta) => format_duration(delta),
        Err(_) => "in the future".to_string(),
    }
}

/// Build a full [`SaveFileEntry`] from a discovered save slot.
fn entry_for_slot(slot: SaveSlot) -> SaveFileEntry {
    let mut version = slot.version.clone();
    let (summary, status) = match load_save_file(&slot.path) {
        Ok(state) => {
            version.clone_from(&state.version);
            let status = if state.version == HOARD_VERSION {
                SaveFileStatus::Ready
            } else {
                SaveFileStatus::VersionMismatch {
                    save_version: state.version.clone(),
                    current_version: HOARD_VERSION.to_string(),
                }
            };
            let summary = SaveSummary {
                leader: state
                    .members
                    .first()
                    .map(|member| member.name.clone())
                    .unwrap_or_default(),
                party_size: state.members.len(),
                gold: state.supplies.gold,
            };
            (Some(summary), status)
        },
        Err(err) => {
            warn!("failed to load save '{}' ({}): {err:#}", slot.slot, slot.path.display());
            (
                None,
                SaveFileStatus::Corrupted {
                    message: trim_error(&format!("{err:#}")),
                },
            )
        },
    };

    SaveFileEntry {
        slot: slot.slot,
        version,
        path: slot.path,
        file_name: slot.file_name,
        modified: slot.modified,
        summary,
        status,
    }
}

fn slot_from_entry(entry: &fs::DirEntry) -> Option<SaveSlot> {
    let path = entry.path();
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("ron") {
        return None;
    }
    let file_name = path.file_name().and_then(|name| name.to_str())?.to_string();
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let (slot, version) = stem.rsplit_once("-hoard-")?;
    if slot.is_empty() {
        return None;
    }
    let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
    Some(SaveSlot {
        slot: slot.to_string(),
        version: version.to_string(),
        path,
        file_name,
        modified,
    })
}

/// Convert a duration into a compact "time ago" string.
fn format_duration(duration: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;
    const WEEK: u64 = DAY * 7;

    let secs = duration.as_secs();
    if secs < 30 {
        "just now".to_string()
    } else if secs < MINUTE {
        format!("{secs}s ago")
    } else if secs < HOUR {
        format!("{}m ago", secs / MINUTE)
    } else if secs < DAY {
        format!("{}h ago", secs / HOUR)
    } else if secs < WEEK {
        format!("{}d ago", secs / DAY)
    } else {
        format!("{}w ago", secs / WEEK)
    }
}

/// Clamp verbose error messages to a readable length.
fn trim_error(message: &str) -> String {
    if message.chars().count() <= 120 {
        return message.to_string();
    }
    let mut trimmed: String = message.chars().take(117).collect();
    trimmed.push_str("...");
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::EquipSlot;
    use crate::stats::{Attribute, Modifier, ModifierTarget};
    use tempfile::tempdir;

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_template(Item {
            id: "lantern".into(),
            name: "Lantern".into(),
            description: "A hooded lantern".into(),
            weight_grams: 900,
            equip_slots: vec![EquipSlot::LeftHand],
            modifiers: vec![Modifier {
                target: ModifierTarget::Attribute(Attribute::Perception),
                amount: 1,
            }],
            light_radius: 6,
            ..Item::default()
        });
        catalog.insert_template(Item {
            id: "arrow".into(),
            name: "Arrow".into(),
            description: "A fletched arrow".into(),
            weight_grams: 40,
            max_stack: 20,
            ..Item::default()
        });
        catalog
    }

    fn create_test_party(catalog: &Catalog) -> Party {
        let mut party = Party::new();
        let mut vesna = Character::new("vesna", "Vesna", "wanderers");
        vesna.player_controlled = true;
        vesna.stats.set_attribute(Attribute::Perception, 4);
        vesna.set_disposition("guild", 25);
        vesna.add_item(
            BagKind::Equipped,
            catalog.spawn("lantern").unwrap(),
            Some(EquipSlot::LeftHand.index()),
            LoadContext::Live,
        );
        vesna.add_item(
            BagKind::Backpack,
            catalog.spawn_stack("arrow", 7).unwrap(),
            Some(3),
            LoadContext::Live,
        );
        party.add_member(vesna);
        party.add_gold(120);
        party.add_water(3.5);
        party
    }

    #[test]
    fn snapshot_round_trips_through_ron() {
        let catalog = create_test_catalog();
        let party = create_test_party(&catalog);
        let before = party.member("vesna").unwrap();
        assert_eq!(before.stats.attribute(Attribute::Perception), 5);

        let state = snapshot_party(&party);
        let raw = ron::ser::to_string(&state).unwrap();
        let reloaded: SaveState = ron::from_str(&raw).unwrap();
        let restored = restore_party(&reloaded, &catalog).unwrap();

        assert_eq!(restored.gold(), 120);
        assert!((restored.water() - 3.5).abs() < f32::EPSILON);
        let vesna = restored.member("vesna").unwrap();
        assert!(vesna.player_controlled);
        // Carried load covers equipped gear only and is derived, not stored.
        assert_eq!(vesna.stats.load_grams(), 900);
        assert_eq!(vesna.light_radius(), 6);
        // Modifiers came back with the sheet, not a second application.
        assert_eq!(vesna.stats.modifiers().len(), 1);
        assert_eq!(vesna.stats.attribute(Attribute::Perception), 5);
        let arrows = vesna.inventory().bag(BagKind::Backpack).get(3).unwrap();
        assert_eq!(arrows.stack_size, 7);
        assert_eq!(vesna.disposition_towards(&Character::new("m", "M", "guild")), 25);
    }

    #[test]
    fn write_and_load_use_the_slot_naming_scheme() {
        let dir = tempdir().unwrap();
        let catalog = create_test_catalog();
        let state = snapshot_party(&create_test_party(&catalog));

        let path = write_save_file(dir.path(), "alpha", &state).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(save_file_name("alpha").as_str())
        );
        let loaded = load_save_file(&path).unwrap();
        assert_eq!(loaded.members.len(), 1);
        assert_eq!(loaded.supplies.gold, 120);
    }

    #[test]
    fn collect_save_slots_handles_missing_directory() {
        let dir = tempdir().unwrap();
        let slots = collect_save_slots(&dir.path().join("missing")).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn collect_save_slots_skips_invalid_files() {
        let dir = tempdir().unwrap();
        let path = dir.path();
        fs::write(path.join("alpha-hoard-0.3.0.ron"), "[]").unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();
        fs::create_dir_all(path.join("nested")).unwrap();

        let slots = collect_save_slots(path).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot, "alpha");
        assert_eq!(slots[0].version, "0.3.0");
    }

    #[test]
    fn build_save_entries_reports_status_variants() {
        let dir = tempdir().unwrap();
        let path = dir.path();
        let catalog = create_test_catalog();
        let state = snapshot_party(&create_test_party(&catalog));

        write_save_file(path, "alpha", &state).unwrap();

        let mut stale = state.clone();
        stale.version = "0.0.1".to_string();
        fs::write(
            path.join("beta-hoard-0.0.1.ron"),
            ron::ser::to_string(&stale).unwrap(),
        )
        .unwrap();

        fs::write(path.join("gamma-hoard-0.0.0.ron"), "this is not valid ron").unwrap();

        let entries = build_save_entries(path).unwrap();

        let alpha = entries.iter().find(|entry| entry.slot == "alpha").unwrap();
        assert!(matches!(alpha.status, SaveFileStatus::Ready));
        assert_eq!(alpha.summary.as_ref().unwrap().leader, "Vesna");
        assert_eq!(alpha.summary.as_ref().unwrap().gold, 120);

        let beta = entries.iter().find(|entry| entry.slot == "beta").unwrap();
        assert!(matches!(beta.status, SaveFileStatus::VersionMismatch { .. }));
        assert_eq!(beta.version, "0.0.1");

        let gamma = entries.iter().find(|entry| entry.slot == "gamma").unwrap();
        assert!(matches!(gamma.status, SaveFileStatus::Corrupted { .. }));
        assert!(gamma.summary.is_none());
    }
}

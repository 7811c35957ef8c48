//! Ownership descriptors used for possession and theft checks.

use hoard_data::OwnerDef;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::Id;

/// Claim record attached to every item.
///
/// An empty descriptor (no character and no faction) means the item is
/// unclaimed and anyone may take it. A `fixed` descriptor survives sales
/// that would otherwise strip ownership.
///
/// Equality follows possession rules rather than structure: two owners
/// with character ids are the same owner exactly when the ids match, and
/// only characterless owners fall back to comparing factions. The
/// relation is not transitive, so `Owner` must not be used as a map key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    character: Option<Id>,
    faction: Option<Id>,
    fixed: bool,
}

impl PartialEq for Owner {
    fn eq(&self, other: &Self) -> bool {
        if self.character.is_some() || other.character.is_some() {
            self.character == other.character
        } else {
            self.faction == other.faction
        }
    }
}

impl Owner {
    /// Build a descriptor; character ids are stored lowercase.
    pub fn new(character: Option<Id>, faction: Option<Id>, fixed: bool) -> Owner {
        Owner {
            character: character.map(|id| id.to_lowercase()),
            faction,
            fixed,
        }
    }

    pub fn unclaimed() -> Owner {
        Owner::default()
    }

    pub fn of_character(character_id: &str) -> Owner {
        Owner::new(Some(character_id.to_string()), None, false)
    }

    pub fn of_faction(faction: &str) -> Owner {
        Owner::new(None, Some(faction.to_string()), false)
    }

    pub fn character(&self) -> Option<&str> {
        self.character.as_deref()
    }

    pub fn faction(&self) -> Option<&str> {
        self.faction.as_deref()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_empty(&self) -> bool {
        self.character.is_none() && self.faction.is_none()
    }

    /// Reset to unclaimed.
    pub fn clear(&mut self) {
        self.character = None;
        self.faction = None;
        self.fixed = false;
    }

    /// Whether the given character may claim items under this descriptor.
    ///
    /// Unclaimed items are claimable by everyone; otherwise the character
    /// must be the named owner or belong to the owning faction.
    pub fn includes(&self, character_id: &str, faction: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        if let Some(owner) = &self.character {
            if owner.eq_ignore_ascii_case(character_id) {
                return true;
            }
        }
        self.faction.as_deref() == Some(faction)
    }

    /// Whether the given faction as a whole may claim items under this
    /// descriptor. Character-owned items never belong to a faction at
    /// large.
    pub fn includes_faction(&self, faction: &str) -> bool {
        if self.character.is_some() {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        self.faction.as_deref() == Some(faction)
    }
}

impl From<&OwnerDef> for Owner {
    fn from(def: &OwnerDef) -> Owner {
        Owner::new(def.character.clone(), def.faction.clone(), def.fixed)
    }
}

impl From<&Owner> for OwnerDef {
    fn from(owner: &Owner) -> OwnerDef {
        OwnerDef {
            character: owner.character.clone(),
            faction: owner.faction.clone(),
            fixed: owner.fixed,
        }
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(character) = &self.character {
            write!(f, "{character}")
        } else if let Some(faction) = &self.faction {
            write!(f, "the {faction}")
        } else {
            write!(f, "no one")
        }
    }
}

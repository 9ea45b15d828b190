//! Read-mostly reference collections fetched once at session start.
//!
//! Every collection is independently optional. A missing collection leaves
//! its features degraded (an empty ability list, no ancestry bonuses) but
//! never prevents a session from running.

use serde::{Deserialize, Serialize};

use crate::ability::Ability;
use crate::item::Item;
use crate::profile::AbilityScores;

/// An ancestry (playable race) with score bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ancestry {
    /// Display name.
    pub name: String,
    /// Score bonuses applied on top of the base scores.
    pub bonus: AbilityScores,
    /// Abilities granted by this ancestry.
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

/// A learnable skill tied to one of the six scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Display name.
    pub name: String,
    /// Name of the governing ability score.
    pub governing_score: String,
}

/// A character background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Display name.
    pub name: String,
    /// Flavor description.
    #[serde(default)]
    pub description: String,
}

/// A character class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Display name.
    pub name: String,
    /// Hit die upper bound, as in "1dN" per level.
    pub hit_die: u32,
}

/// All reference collections together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Known abilities.
    #[serde(default)]
    pub abilities: Vec<Ability>,
    /// Playable ancestries.
    #[serde(default)]
    pub ancestries: Vec<Ancestry>,
    /// Item catalog.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Learnable skills.
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Character backgrounds.
    #[serde(default)]
    pub backgrounds: Vec<Background>,
    /// Character classes.
    #[serde(default)]
    pub classes: Vec<ClassDef>,
}

impl ReferenceData {
    /// Parse reference data from a JSON document. Absent collections
    /// default to empty.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

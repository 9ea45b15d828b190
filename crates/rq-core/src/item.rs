//! Items carried in inventories, dropped as loot, or scattered on the map.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Offensive equipment.
    Weapon,
    /// Defensive equipment.
    Armor,
    /// Rings, amulets, trinkets.
    Accessory,
    /// Single-use items.
    Consumable,
    /// Crafting or trade goods.
    Material,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weapon => write!(f, "weapon"),
            Self::Armor => write!(f, "armor"),
            Self::Accessory => write!(f, "accessory"),
            Self::Consumable => write!(f, "consumable"),
            Self::Material => write!(f, "material"),
        }
    }
}

/// An item instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier of this instance.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Category.
    pub kind: ItemKind,
}

impl Item {
    /// Create a new item with a random ID.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }
}

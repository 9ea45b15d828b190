//! The entity store: single source of truth for everything simulated.
//!
//! One optional player character, any number of enemies, and transient map
//! items. External rendering reads this store; systems mutate it one at a
//! time, never concurrently.

use rq_core::entity::{Character, Enemy, EntityId};
use rq_core::geo::LatLng;
use rq_core::item::Item;

/// A transient pickup lying on the map.
#[derive(Debug, Clone)]
pub struct MapItem {
    /// Unique identifier.
    pub id: EntityId,
    /// Where the item lies.
    pub position: LatLng,
    /// The item itself.
    pub item: Item,
}

/// Owns all simulated entities.
#[derive(Debug, Default)]
pub struct EntityStore {
    character: Option<Character>,
    enemies: Vec<Enemy>,
    map_items: Vec<MapItem>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the player character, replacing any existing one.
    pub fn set_character(&mut self, character: Character) {
        self.character = Some(character);
    }

    /// The player character, if alive.
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// Mutable access to the player character.
    pub fn character_mut(&mut self) -> Option<&mut Character> {
        self.character.as_mut()
    }

    /// Add an enemy. Returns its ID.
    pub fn add_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.id;
        self.enemies.push(enemy);
        id
    }

    /// Look up an enemy by ID.
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Mutable lookup of an enemy by ID.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Remove an enemy by ID, returning it if present.
    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    /// All enemies in insertion order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// IDs of all enemies in insertion order.
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies.iter().map(|e| e.id).collect()
    }

    /// Number of live enemies.
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Place an item on the map. Returns its ID.
    pub fn place_item(&mut self, position: LatLng, item: Item) -> EntityId {
        let id = EntityId::new();
        self.map_items.push(MapItem { id, position, item });
        id
    }

    /// Pick an item up off the map, removing it.
    pub fn take_item(&mut self, id: EntityId) -> Option<MapItem> {
        let idx = self.map_items.iter().position(|m| m.id == id)?;
        Some(self.map_items.remove(idx))
    }

    /// All items currently on the map.
    pub fn map_items(&self) -> &[MapItem] {
        &self.map_items
    }

    /// Terminal session reset: clears the character (and with it the
    /// inventory), all enemies, and all map items.
    ///
    /// This is the observed player-defeat behavior, kept as an explicit
    /// design decision pending product review.
    pub fn reset(&mut self) {
        self.character = None;
        self.enemies.clear();
        self.map_items.clear();
    }
}

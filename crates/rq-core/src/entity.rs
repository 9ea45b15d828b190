//! The two tagged entity variants: the player character and hostile enemies.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ability::Ability;
use crate::geo::LatLng;
use crate::item::Item;
use crate::patrol::PatrolState;
use crate::profile::CombatProfile;

/// Unique identifier for a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The player character. Exactly one exists per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier.
    pub id: EntityId,
    /// Combat-facing stats.
    pub profile: CombatProfile,
    /// Current position, mirroring the device location.
    pub position: LatLng,
    /// Carried items.
    pub inventory: Vec<Item>,
}

impl Character {
    /// Create a character at a position.
    pub fn new(profile: CombatProfile, position: LatLng) -> Self {
        Self {
            id: EntityId::new(),
            profile,
            position,
            inventory: Vec::new(),
        }
    }
}

/// A hostile enemy patrolling a generated route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique identifier.
    pub id: EntityId,
    /// Combat-facing stats.
    pub profile: CombatProfile,
    /// Current position.
    pub position: LatLng,
    /// Progress along the patrol loop.
    pub patrol: PatrolState,
    /// The melee ability used when attacking.
    pub ability: Ability,
    /// When this enemy last attacked, in simulation milliseconds. Attacks
    /// are only legal once `now - last_attack_ms >= ability.cooldown_ms`.
    pub last_attack_ms: u64,
    /// Detection distance in meters, derived from intelligence + wisdom at
    /// construction.
    pub perception_radius_m: f64,
    /// Items dropped on defeat.
    pub loot: Vec<Item>,
}

impl Enemy {
    /// Create an enemy at the patrol's current position.
    ///
    /// The perception radius is derived from the profile's mental stats.
    pub fn new(profile: CombatProfile, patrol: PatrolState, ability: Ability) -> Self {
        let perception_radius_m = profile.scores.perception_radius_m();
        let position = patrol.position();
        Self {
            id: EntityId::new(),
            profile,
            position,
            patrol,
            ability,
            last_attack_ms: 0,
            perception_radius_m,
            loot: Vec::new(),
        }
    }

    /// Attach starting loot.
    pub fn with_loot(mut self, loot: Vec<Item>) -> Self {
        self.loot = loot;
        self
    }

    /// True once the attack cooldown has elapsed at `now_ms`.
    pub fn can_attack(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_attack_ms) >= self.ability.cooldown_ms
    }
}

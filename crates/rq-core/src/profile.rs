//! Combat-facing stats shared by the player character and enemies.
//!
//! There is no entity class hierarchy. Both tagged variants carry the same
//! `CombatProfile` record, and combat code operates on profiles alone.

use serde::{Deserialize, Serialize};

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Physical power; drives melee attack modifiers.
    pub strength: i32,
    /// Agility and reflexes.
    pub dexterity: i32,
    /// Endurance and toughness.
    pub constitution: i32,
    /// Reasoning; half of the perception radius derivation.
    pub intelligence: i32,
    /// Awareness; the other half of the perception radius derivation.
    pub wisdom: i32,
    /// Force of personality.
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// The standard modifier for a score: `floor((score - 10) / 2)`.
    pub fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }

    /// Perception radius in meters, derived from the mental stats.
    ///
    /// Deliberately decoupled from movement speed; the derivation is a
    /// tunable design choice, not interchangeable with other stats.
    pub fn perception_radius_m(&self) -> f64 {
        (self.intelligence + self.wisdom).max(0) as f64
    }
}

/// Current and maximum health and mana.
///
/// All mutation goes through the clamping methods, keeping
/// `0 <= health <= max_health` and `0 <= mana <= max_mana` at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Current hit points.
    pub health: i32,
    /// Maximum hit points.
    pub max_health: i32,
    /// Current mana.
    pub mana: i32,
    /// Maximum mana.
    pub max_mana: i32,
}

impl Vitals {
    /// Create vitals at full health and mana.
    pub fn new(max_health: i32, max_mana: i32) -> Self {
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
        }
    }

    /// Reduce health, clamping at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }

    /// Restore health, clamping at the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    /// Spend mana if enough is available. Returns false without spending
    /// otherwise.
    pub fn spend_mana(&mut self, cost: i32) -> bool {
        if cost > self.mana {
            return false;
        }
        self.mana -= cost.max(0);
        true
    }

    /// Restore both pools to their maxima.
    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
    }

    /// True once health has reached zero.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// The combat-facing record shared by player characters and enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatProfile {
    /// Display name.
    pub name: String,
    /// The six ability scores.
    pub scores: AbilityScores,
    /// Health and mana pools.
    pub vitals: Vitals,
    /// Current level (1-based).
    pub level: u32,
    /// Accumulated experience points.
    pub experience: u64,
    /// Movement speed in meters per tick. Also serves as effective melee
    /// reach, preserved observed behavior (see DESIGN.md open questions).
    pub speed_m: f64,
    /// Defensive threshold an attack roll must meet or exceed.
    pub armor_class: i32,
}

impl CombatProfile {
    /// Create a level 1 profile with the given name, scores, and pools.
    pub fn new(name: impl Into<String>, scores: AbilityScores, vitals: Vitals) -> Self {
        Self {
            name: name.into(),
            scores,
            vitals,
            level: 1,
            experience: 0,
            speed_m: 1.5,
            armor_class: 10,
        }
    }

    /// Set the movement speed in meters per tick.
    pub fn with_speed(mut self, speed_m: f64) -> Self {
        self.speed_m = speed_m;
        self
    }

    /// Set the armor class.
    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    /// Strength modifier applied to melee attack rolls.
    pub fn strength_mod(&self) -> i32 {
        AbilityScores::modifier(self.scores.strength)
    }
}

//! Abilities as a closed tagged union of kinds.
//!
//! Behavior dispatch is by `AbilityKind`, one resolver per kind in
//! rq-mechanics, so adding a kind is a compile error until every resolver
//! site handles it. There is no name-keyed lookup.

use serde::{Deserialize, Serialize};

/// The kind of an ability, driving which resolver handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// A melee attack resolved with attack and damage rolls.
    Melee,
    /// A mana-fueled restoration of health.
    Heal,
    /// A passive ability with no active resolution.
    Passive,
}

impl std::fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Melee => write!(f, "melee"),
            Self::Heal => write!(f, "heal"),
            Self::Passive => write!(f, "passive"),
        }
    }
}

/// An ability an entity can use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Display name.
    pub name: String,
    /// The kind, selecting the resolver.
    pub kind: AbilityKind,
    /// Upper bound of the uniform damage (or healing) roll, as in "1dN".
    pub damage_die: u32,
    /// Number of sub-attacks per use.
    pub hits: u32,
    /// Reach added to the wielder's speed, in meters.
    pub range_m: f64,
    /// Mana spent on a resolved use.
    pub mana_cost: i32,
    /// Minimum milliseconds between uses.
    pub cooldown_ms: u64,
}

impl Ability {
    /// Create a single-hit melee ability with no mana cost.
    pub fn melee(name: impl Into<String>, damage_die: u32, range_m: f64, cooldown_ms: u64) -> Self {
        Self {
            name: name.into(),
            kind: AbilityKind::Melee,
            damage_die,
            hits: 1,
            range_m,
            mana_cost: 0,
            cooldown_ms,
        }
    }

    /// Create a healing ability.
    pub fn heal(name: impl Into<String>, damage_die: u32, mana_cost: i32) -> Self {
        Self {
            name: name.into(),
            kind: AbilityKind::Heal,
            damage_die,
            hits: 1,
            range_m: 0.0,
            mana_cost,
            cooldown_ms: 0,
        }
    }

    /// Set the number of sub-attacks per use.
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits;
        self
    }

    /// Set the mana cost.
    pub fn with_mana_cost(mut self, cost: i32) -> Self {
        self.mana_cost = cost;
        self
    }
}

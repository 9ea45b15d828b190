//! Spawn cycles and feedback expiry.
//!
//! Enemy spawning is split in two: fetching a patrol route is an external,
//! possibly slow concern handled outside the tick loop, while placing
//! enemies on a completed route happens here. Completed routes are queued
//! with [`EnemySpawnSystem::push_route`] and consumed on the next tick, so
//! a slow or failed route fetch never stalls movement or combat.

use std::collections::VecDeque;

use rand::Rng;

use rq_core::ability::Ability;
use rq_core::entity::Enemy;
use rq_core::geo::{self, LatLng};
use rq_core::item::{Item, ItemKind};
use rq_core::patrol::PatrolState;
use rq_core::profile::{AbilityScores, CombatProfile, Vitals};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::feedback::FeedbackKind;
use crate::system::System;

/// Maximum positional scatter for spawned world items, in meters per axis.
const ITEM_JITTER_M: f64 = 30.0;

/// Places enemies on completed patrol routes.
#[derive(Debug, Default)]
pub struct EnemySpawnSystem {
    pending_routes: VecDeque<Vec<LatLng>>,
}

impl EnemySpawnSystem {
    /// Create the system with no queued routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completed patrol route for the next tick.
    pub fn push_route(&mut self, route: Vec<LatLng>) {
        self.pending_routes.push_back(route);
    }

    /// Number of routes waiting to be consumed.
    pub fn pending_routes(&self) -> usize {
        self.pending_routes.len()
    }
}

impl System for EnemySpawnSystem {
    fn name(&self) -> &str {
        "enemy-spawn"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        while let Some(route) = self.pending_routes.pop_front() {
            if route.len() < 2 {
                // Unusable route; wait for the next fetch cycle.
                continue;
            }
            let count = ctx.config.enemies_per_spawn;
            let cap = ctx.config.micro_steps_per_segment;
            for idx in 0..count {
                // Staggered start steps spread the pack along the loop.
                let patrol = PatrolState::new(route.clone(), idx, cap)?;
                let position = patrol.position();
                let enemy = goblin(patrol, ctx.config.attack_cooldown_ms);
                let name = enemy.profile.name.clone();
                ctx.store.add_enemy(enemy);
                ctx.emit(FeedbackKind::Spawn, position, name);
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// The stock patrol enemy.
fn goblin(patrol: PatrolState, cooldown_ms: u64) -> Enemy {
    let scores = AbilityScores {
        strength: 8,
        dexterity: 14,
        constitution: 10,
        intelligence: 8,
        wisdom: 10,
        charisma: 8,
    };
    let profile =
        CombatProfile::new("Goblin", scores, Vitals::new(7, 0)).with_armor_class(13);
    Enemy::new(profile, patrol, Ability::melee("Rusty Club", 4, 0.5, cooldown_ms))
        .with_loot(vec![Item::new("Goblin Ear", ItemKind::Material)])
}

/// Drops a random world item near the player on a slow cadence.
#[derive(Debug)]
pub struct ItemSpawnSystem {
    cadence: u64,
    table: Vec<(&'static str, ItemKind)>,
}

impl ItemSpawnSystem {
    /// Create the system with the default loot table.
    pub fn new(cadence: u64) -> Self {
        Self {
            cadence,
            table: vec![
                ("Healing Potion", ItemKind::Consumable),
                ("Iron Ore", ItemKind::Material),
                ("Worn Dagger", ItemKind::Weapon),
                ("Leather Scraps", ItemKind::Armor),
                ("Copper Ring", ItemKind::Accessory),
            ],
        }
    }
}

impl System for ItemSpawnSystem {
    fn name(&self) -> &str {
        "item-spawn"
    }

    fn cadence_ticks(&self) -> u64 {
        self.cadence
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        // Items only appear around a live character.
        let Some(center) = ctx.store.character().map(|c| c.position) else {
            return Ok(());
        };
        let (name, kind) = self.table[ctx.rng.random_range(0..self.table.len())];
        let east = ctx.rng.random_range(-ITEM_JITTER_M..=ITEM_JITTER_M);
        let north = ctx.rng.random_range(-ITEM_JITTER_M..=ITEM_JITTER_M);
        let position = geo::offset_meters(center, east, north);
        ctx.store.place_item(position, Item::new(name, kind));
        ctx.emit(FeedbackKind::Loot, position, name);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Sweeps expired feedback records on a short cadence.
#[derive(Debug)]
pub struct FeedbackExpirySystem {
    cadence: u64,
}

impl FeedbackExpirySystem {
    /// Create the system.
    pub fn new(cadence: u64) -> Self {
        Self { cadence }
    }
}

impl System for FeedbackExpirySystem {
    fn name(&self) -> &str {
        "feedback-expiry"
    }

    fn cadence_ticks(&self) -> u64 {
        self.cadence
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let now = ctx.now_ms();
        ctx.feedback.sweep(now);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

//! Perception-driven enemy AI and combat application.
//!
//! Each movement tick classifies every enemy into Patrol, Pursue, or Attack
//! from its sensed distance to the player, then acts on that state. This
//! module also owns the store-side consequences of combat for both attack
//! directions: health application, defeat removal, loot drops, experience
//! grants, and the terminal reset when the player falls. Every resolution
//! branch emits floating feedback, including the early aborts.

use std::collections::HashMap;

use rand::Rng;

use rq_core::ability::Ability;
use rq_core::entity::EntityId;
use rq_core::geo::{self, LatLng};
use rq_core::profile::CombatProfile;
use rq_mechanics::combat::{
    AbilityResolution, AttackOutcome, HealResolution, MeleeResolution, resolve_ability,
    resolve_melee,
};

use crate::context::SimContext;
use crate::error::SimResult;
use crate::feedback::FeedbackKind;
use crate::system::System;

/// Maximum positional scatter for dropped loot, in meters per axis.
const LOOT_JITTER_M: f64 = 3.0;

/// The behavioral state of an enemy, re-derived every movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    /// Following the patrol loop; the player is out of perception range.
    Patrol,
    /// Closing on the player: perceived but beyond attack reach.
    Pursue,
    /// Within reach; attacking whenever the cooldown allows.
    Attack,
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patrol => write!(f, "patrol"),
            Self::Pursue => write!(f, "pursue"),
            Self::Attack => write!(f, "attack"),
        }
    }
}

/// The movement/AI system: patrol interpolation, pursuit, and melee.
#[derive(Debug, Default)]
pub struct PerceptionSystem {
    states: HashMap<EntityId, AiState>,
}

impl PerceptionSystem {
    /// Create the system.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last derived state for an enemy, if it is still alive.
    pub fn state_of(&self, id: EntityId) -> Option<AiState> {
        self.states.get(&id).copied()
    }
}

impl System for PerceptionSystem {
    fn name(&self) -> &str {
        "perception"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let now = ctx.now_ms();

        for id in ctx.store.enemy_ids() {
            let Some(char_pos) = ctx.store.character().map(|c| c.position) else {
                // No live character: everyone patrols.
                if let Some(e) = ctx.store.enemy_mut(id) {
                    e.position = e.patrol.advance();
                }
                self.states.insert(id, AiState::Patrol);
                continue;
            };

            let Some((pos, radius, speed)) = ctx
                .store
                .enemy(id)
                .map(|e| (e.position, e.perception_radius_m, e.profile.speed_m))
            else {
                continue;
            };

            let d = geo::distance_meters(pos, char_pos);
            let state = if d > radius {
                AiState::Patrol
            } else if d > speed {
                AiState::Pursue
            } else {
                AiState::Attack
            };
            self.states.insert(id, state);

            match state {
                AiState::Patrol => {
                    if let Some(e) = ctx.store.enemy_mut(id) {
                        e.position = e.patrol.advance();
                    }
                }
                AiState::Pursue => {
                    let step = ctx.config.pursue_step_m;
                    if let Some(e) = ctx.store.enemy_mut(id) {
                        e.position = geo::step_toward(e.position, char_pos, step);
                    }
                }
                AiState::Attack => {
                    let ready = ctx.store.enemy(id).is_some_and(|e| e.can_attack(now));
                    if ready {
                        if let Some(e) = ctx.store.enemy_mut(id) {
                            e.last_attack_ms = now;
                        }
                        enemy_attack(ctx, id)?;
                    }
                }
            }
        }

        self.states.retain(|id, _| ctx.store.enemy(*id).is_some());
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Resolve and apply one enemy melee attack against the player.
fn enemy_attack(ctx: &mut SimContext<'_>, id: EntityId) -> SimResult<()> {
    let Some((attacker, ability, attacker_pos)) = ctx
        .store
        .enemy(id)
        .map(|e| (e.profile.clone(), e.ability.clone(), e.position))
    else {
        return Ok(());
    };
    let target = ctx
        .store
        .character()
        .map(|c| (c.profile.clone(), c.position));

    let resolution = match &target {
        Some((profile, pos)) => {
            let d = geo::distance_meters(attacker_pos, *pos);
            resolve_melee(&attacker, &ability, Some((profile, d)), ctx.rng)
        }
        None => resolve_melee(&attacker, &ability, None, ctx.rng),
    };

    match resolution {
        MeleeResolution::NoTarget
        | MeleeResolution::OutOfRange { .. }
        | MeleeResolution::InsufficientMana => {
            ctx.emit(FeedbackKind::Miss, attacker_pos, "Miss");
        }
        MeleeResolution::Resolved(outcome) => {
            let target_pos = target.as_ref().map_or(attacker_pos, |(_, p)| *p);
            if let Some(e) = ctx.store.enemy_mut(id) {
                e.profile.vitals.spend_mana(ability.mana_cost);
            }
            emit_sub_attacks(ctx, &outcome, target_pos);
            if let Some(c) = ctx.store.character_mut() {
                c.profile.vitals.take_damage(outcome.total_damage as i32);
            }
            if outcome.defeated {
                let name = target.map(|(p, _)| p.name).unwrap_or_default();
                ctx.emit(FeedbackKind::Defeat, target_pos, format!("{name} has fallen"));
                // Terminal session reset, kept as observed behavior.
                ctx.store.reset();
            }
        }
    }
    Ok(())
}

/// Resolve and apply a player-initiated ability use.
///
/// Melee targets the nearest live enemy; no enemy at all resolves as a
/// no-target miss.
pub(crate) fn player_attack(ctx: &mut SimContext<'_>, ability: &Ability) -> SimResult<()> {
    let Some((attacker, attacker_pos)) = ctx
        .store
        .character()
        .map(|c| (c.profile.clone(), c.position))
    else {
        return Ok(());
    };

    let target = ctx
        .store
        .enemies()
        .iter()
        .map(|e| {
            (
                e.id,
                e.profile.clone(),
                e.position,
                geo::distance_meters(attacker_pos, e.position),
            )
        })
        .min_by(|a, b| a.3.total_cmp(&b.3));

    let resolution = match &target {
        Some((_, profile, _, d)) => resolve_ability(&attacker, ability, Some((profile, *d)), ctx.rng),
        None => resolve_ability(&attacker, ability, None, ctx.rng),
    };

    match resolution {
        AbilityResolution::Passive => {
            ctx.emit(FeedbackKind::Miss, attacker_pos, "No effect");
        }
        AbilityResolution::Heal(HealResolution::InsufficientMana) => {
            ctx.emit(FeedbackKind::Miss, attacker_pos, "Not enough mana");
        }
        AbilityResolution::Heal(HealResolution::Healed { amount }) => {
            if let Some(c) = ctx.store.character_mut() {
                c.profile.vitals.spend_mana(ability.mana_cost);
                c.profile.vitals.heal(amount as i32);
            }
            ctx.emit(FeedbackKind::Heal, attacker_pos, format!("+{amount}"));
        }
        AbilityResolution::Melee(res) => {
            apply_player_melee(ctx, ability, res, target, attacker_pos)?;
        }
    }
    Ok(())
}

fn apply_player_melee(
    ctx: &mut SimContext<'_>,
    ability: &Ability,
    resolution: MeleeResolution,
    target: Option<(EntityId, CombatProfile, LatLng, f64)>,
    attacker_pos: LatLng,
) -> SimResult<()> {
    match resolution {
        MeleeResolution::NoTarget
        | MeleeResolution::OutOfRange { .. }
        | MeleeResolution::InsufficientMana => {
            ctx.emit(FeedbackKind::Miss, attacker_pos, "Miss");
        }
        MeleeResolution::Resolved(outcome) => {
            let Some((target_id, target_profile, target_pos, _)) = target else {
                ctx.emit(FeedbackKind::Miss, attacker_pos, "Miss");
                return Ok(());
            };
            if let Some(c) = ctx.store.character_mut() {
                c.profile.vitals.spend_mana(ability.mana_cost);
            }
            emit_sub_attacks(ctx, &outcome, target_pos);
            if outcome.defeated {
                defeat_enemy(ctx, target_id, target_profile.level, target_pos);
            } else if let Some(e) = ctx.store.enemy_mut(target_id) {
                e.profile.vitals.take_damage(outcome.total_damage as i32);
            }
        }
    }
    Ok(())
}

/// One feedback record per sub-attack: a damage number on a hit, "Miss"
/// otherwise.
fn emit_sub_attacks(ctx: &mut SimContext<'_>, outcome: &AttackOutcome, target_pos: LatLng) {
    for sub in &outcome.sub_attacks {
        if sub.hit {
            ctx.emit(FeedbackKind::Damage, target_pos, sub.damage.to_string());
        } else {
            ctx.emit(FeedbackKind::Miss, target_pos, "Miss");
        }
    }
}

/// Remove a defeated enemy, scatter its loot, and award experience equal to
/// its level to the player through the active progression policy.
fn defeat_enemy(ctx: &mut SimContext<'_>, id: EntityId, level: u32, at: LatLng) {
    let Some(enemy) = ctx.store.remove_enemy(id) else {
        return;
    };
    ctx.emit(
        FeedbackKind::Defeat,
        at,
        format!("{} defeated", enemy.profile.name),
    );

    for item in enemy.loot {
        let east = ctx.rng.random_range(-LOOT_JITTER_M..=LOOT_JITTER_M);
        let north = ctx.rng.random_range(-LOOT_JITTER_M..=LOOT_JITTER_M);
        let drop_pos = geo::offset_meters(at, east, north);
        ctx.emit(FeedbackKind::Loot, drop_pos, item.name.clone());
        ctx.store.place_item(drop_pos, item);
    }

    let mut leveled = None;
    if let Some(c) = ctx.store.character_mut() {
        leveled = ctx.policy.add_experience(&mut c.profile, u64::from(level));
    }
    if let Some(up) = leveled {
        let pos = ctx.store.character().map_or(at, |c| c.position);
        ctx.emit(FeedbackKind::LevelUp, pos, format!("Level {}", up.new_level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rq_core::entity::{Character, Enemy};
    use rq_core::item::{Item, ItemKind};
    use rq_core::patrol::PatrolState;
    use rq_core::profile::{AbilityScores, Vitals};
    use rq_mechanics::FibonacciProgression;

    use crate::clock::SimClock;
    use crate::config::SimConfig;
    use crate::feedback::FeedbackLog;
    use crate::store::EntityStore;

    const ORIGIN: LatLng = LatLng {
        lat: 52.52,
        lng: 13.405,
    };

    struct Fixture {
        store: EntityStore,
        clock: SimClock,
        feedback: FeedbackLog,
        rng: StdRng,
        config: SimConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: EntityStore::new(),
                clock: SimClock::new(50),
                feedback: FeedbackLog::new(),
                rng: StdRng::seed_from_u64(42),
                config: SimConfig::default(),
            }
        }

        fn advance_clock(&mut self, ticks: u64) {
            for _ in 0..ticks {
                self.clock.advance();
            }
        }

        fn ctx(&mut self) -> SimContext<'_> {
            SimContext {
                store: &mut self.store,
                clock: &self.clock,
                feedback: &mut self.feedback,
                rng: &mut self.rng,
                config: &self.config,
                policy: &FibonacciProgression,
            }
        }
    }

    fn patrol_near(origin: LatLng) -> PatrolState {
        let far = geo::offset_meters(origin, 0.0, 10.0);
        PatrolState::new(vec![origin, far], 0, 20).unwrap()
    }

    /// An always-hitting, one-damage goblin for deterministic combat.
    fn goblin_at(position: LatLng, health: i32) -> Enemy {
        let scores = AbilityScores {
            intelligence: 8,
            wisdom: 10,
            ..AbilityScores::default()
        };
        let profile = CombatProfile::new("Goblin", scores, Vitals::new(health, 0));
        let patrol = PatrolState::new(vec![position, geo::offset_meters(position, 0.0, 10.0)], 0, 20)
            .unwrap();
        Enemy::new(profile, patrol, Ability::melee("Club", 1, 0.5, 2000))
            .with_loot(vec![Item::new("Goblin Ear", ItemKind::Material)])
    }

    fn character_at(position: LatLng) -> Character {
        let profile = CombatProfile::new("Kara", AbilityScores::default(), Vitals::new(100, 50))
            .with_speed(30.0);
        Character::new(profile, position)
    }

    #[test]
    fn patrols_when_no_character() {
        let mut fx = Fixture::new();
        let id = fx.store.add_enemy(goblin_at(ORIGIN, 7));
        let before = fx.store.enemy(id).unwrap().position;
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        let after = fx.store.enemy(id).unwrap().position;
        assert_ne!(before, after);
        assert_eq!(system.state_of(id), Some(AiState::Patrol));
    }

    #[test]
    fn patrols_when_character_out_of_perception() {
        let mut fx = Fixture::new();
        // Goblin perception is 18 m; the character stands 100 m away.
        fx.store
            .set_character(character_at(geo::offset_meters(ORIGIN, 0.0, 100.0)));
        let id = fx.store.add_enemy(goblin_at(ORIGIN, 7));
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        assert_eq!(system.state_of(id), Some(AiState::Patrol));
    }

    #[test]
    fn pursues_inside_perception_radius() {
        let mut fx = Fixture::new();
        let char_pos = geo::offset_meters(ORIGIN, 0.0, 10.0);
        fx.store.set_character(character_at(char_pos));
        let id = fx.store.add_enemy(goblin_at(ORIGIN, 7));
        let before = geo::distance_meters(ORIGIN, char_pos);
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        assert_eq!(system.state_of(id), Some(AiState::Pursue));
        let after = geo::distance_meters(fx.store.enemy(id).unwrap().position, char_pos);
        // Closed by one pursue step (1 m by default).
        assert!((before - after - fx.config.pursue_step_m).abs() < 0.05);
    }

    #[test]
    fn holds_attack_during_cooldown() {
        let mut fx = Fixture::new();
        fx.store.set_character(character_at(ORIGIN));
        let id = fx.store.add_enemy(goblin_at(geo::offset_meters(ORIGIN, 0.0, 1.0), 7));
        // now = 50 ms, fresh enemy: still cooling down.
        fx.advance_clock(1);
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        assert_eq!(system.state_of(id), Some(AiState::Attack));
        assert!(fx.feedback.is_empty());
        assert_eq!(fx.store.character().unwrap().profile.vitals.health, 100);
    }

    #[test]
    fn attacks_once_cooldown_elapses() {
        let mut fx = Fixture::new();
        let mut character = character_at(ORIGIN);
        // AC 0: even a minimum roll with a negative modifier lands.
        character.profile.armor_class = 0;
        fx.store.set_character(character);
        let id = fx.store.add_enemy(goblin_at(geo::offset_meters(ORIGIN, 0.0, 1.0), 7));
        fx.advance_clock(40); // now = 2000 ms
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        assert_eq!(fx.store.enemy(id).unwrap().last_attack_ms, 2000);
        // Damage die is 1, so exactly one point landed.
        assert_eq!(fx.store.character().unwrap().profile.vitals.health, 99);
        assert!(!fx.feedback.is_empty());
    }

    #[test]
    fn player_defeat_resets_the_session() {
        let mut fx = Fixture::new();
        let mut character = character_at(ORIGIN);
        character.profile.armor_class = 0;
        character.profile.vitals = Vitals::new(1, 0);
        fx.store.set_character(character);
        fx.store.add_enemy(goblin_at(geo::offset_meters(ORIGIN, 0.0, 1.0), 7));
        fx.store
            .place_item(ORIGIN, Item::new("Potion", ItemKind::Consumable));
        fx.advance_clock(40);
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        assert!(fx.store.character().is_none());
        assert_eq!(fx.store.enemy_count(), 0);
        assert!(fx.store.map_items().is_empty());
        // The defeat notice itself survives the reset.
        assert!(
            fx.feedback
                .active()
                .iter()
                .any(|r| r.kind == FeedbackKind::Defeat)
        );
    }

    #[test]
    fn player_kill_drops_loot_and_grants_experience() {
        let mut fx = Fixture::new();
        fx.store.set_character(character_at(ORIGIN));
        let enemy_pos = geo::offset_meters(ORIGIN, 0.0, 2.0);
        let mut goblin = goblin_at(enemy_pos, 1);
        goblin.profile.armor_class = 0;
        let id = fx.store.add_enemy(goblin);
        let ability = Ability::melee("Strike", 1, 5.0, 2000);

        player_attack(&mut fx.ctx(), &ability).unwrap();

        assert!(fx.store.enemy(id).is_none());
        assert_eq!(fx.store.map_items().len(), 1);
        let drop = &fx.store.map_items()[0];
        assert!(geo::distance_meters(drop.position, enemy_pos) <= 5.0);
        let character = fx.store.character().unwrap();
        // 1 XP from a level 1 goblin reaches fib(2) = 1: level up.
        assert_eq!(character.profile.level, 2);
        assert_eq!(
            character.profile.vitals.health,
            character.profile.vitals.max_health
        );
        assert!(
            fx.feedback
                .active()
                .iter()
                .any(|r| r.kind == FeedbackKind::LevelUp && r.text == "Level 2")
        );
        assert!(
            fx.feedback
                .active()
                .iter()
                .any(|r| r.kind == FeedbackKind::Loot)
        );
    }

    #[test]
    fn out_of_range_player_attack_changes_nothing() {
        let mut fx = Fixture::new();
        fx.store.set_character(character_at(ORIGIN));
        // Distance 100 m; speed 30 + range 5 = reach 35.
        let id = fx
            .store
            .add_enemy(goblin_at(geo::offset_meters(ORIGIN, 0.0, 100.0), 7));
        let ability = Ability::melee("Strike", 6, 5.0, 2000);

        player_attack(&mut fx.ctx(), &ability).unwrap();

        assert_eq!(fx.store.enemy(id).unwrap().profile.vitals.health, 7);
        assert!(fx.store.map_items().is_empty());
        let records = fx.feedback.active();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, FeedbackKind::Miss);
    }

    #[test]
    fn attack_with_no_enemies_is_a_miss() {
        let mut fx = Fixture::new();
        fx.store.set_character(character_at(ORIGIN));
        let ability = Ability::melee("Strike", 6, 5.0, 2000);
        player_attack(&mut fx.ctx(), &ability).unwrap();
        let records = fx.feedback.active();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, FeedbackKind::Miss);
    }

    #[test]
    fn heal_restores_and_spends_mana() {
        let mut fx = Fixture::new();
        let mut character = character_at(ORIGIN);
        character.profile.vitals.take_damage(50);
        fx.store.set_character(character);
        let ability = Ability::heal("Mend", 8, 3);

        player_attack(&mut fx.ctx(), &ability).unwrap();

        let vitals = fx.store.character().unwrap().profile.vitals;
        assert!(vitals.health > 50);
        assert_eq!(vitals.mana, 47);
        assert!(
            fx.feedback
                .active()
                .iter()
                .any(|r| r.kind == FeedbackKind::Heal)
        );
    }

    #[test]
    fn dead_enemy_state_is_dropped() {
        let mut fx = Fixture::new();
        fx.store.set_character(character_at(ORIGIN));
        let mut goblin = goblin_at(geo::offset_meters(ORIGIN, 0.0, 2.0), 1);
        goblin.profile.armor_class = 0;
        let id = fx.store.add_enemy(goblin);
        let mut system = PerceptionSystem::new();
        system.tick(&mut fx.ctx()).unwrap();
        assert!(system.state_of(id).is_some());

        player_attack(&mut fx.ctx(), &Ability::melee("Strike", 1, 5.0, 2000)).unwrap();
        system.tick(&mut fx.ctx()).unwrap();
        assert!(system.state_of(id).is_none());
    }
}

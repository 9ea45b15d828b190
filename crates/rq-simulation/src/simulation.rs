use rand::SeedableRng;
use rand::rngs::StdRng;

use rq_core::ability::Ability;
use rq_mechanics::{FibonacciProgression, ProgressionPolicy};

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::feedback::{FeedbackLog, FloatingFeedback};
use crate::perception::{self, PerceptionSystem};
use crate::spawn::{EnemySpawnSystem, FeedbackExpirySystem, ItemSpawnSystem};
use crate::store::EntityStore;
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the entity store, clock, RNG, feedback log, progression policy, and
/// registered systems. Drives the tick loop: each tick advances the clock,
/// then runs every system whose cadence divides the new tick number, in
/// registration order and to completion.
pub struct Simulation {
    store: EntityStore,
    clock: SimClock,
    rng: StdRng,
    feedback: FeedbackLog,
    config: SimConfig,
    policy: Box<dyn ProgressionPolicy>,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("systems", &self.systems.len())
            .field("enemies", &self.store.enemy_count())
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl Simulation {
    /// Create a new simulation from a configuration. Starts with no
    /// systems registered and the Fibonacci leveling policy.
    pub fn new(config: SimConfig) -> Self {
        let clock = SimClock::new(config.millis_per_tick);
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            store: EntityStore::new(),
            clock,
            rng,
            feedback: FeedbackLog::new(),
            config,
            policy: Box::new(FibonacciProgression),
            systems: Vec::new(),
            initialized: false,
        }
    }

    /// Create a simulation with the standard system set: perception and
    /// combat every tick, enemy spawn placement, periodic item spawns,
    /// and feedback expiry sweeps.
    pub fn with_default_systems(config: SimConfig) -> Self {
        let item_ticks = config.item_spawn_ticks;
        let sweep_ticks = config.feedback_sweep_ticks;
        let mut sim = Self::new(config);
        sim.add_system(PerceptionSystem::new());
        sim.add_system(EnemySpawnSystem::new());
        sim.add_system(ItemSpawnSystem::new(item_ticks));
        sim.add_system(FeedbackExpirySystem::new(sweep_ticks));
        sim
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Replace the leveling policy.
    pub fn set_policy(&mut self, policy: Box<dyn ProgressionPolicy>) {
        self.policy = policy;
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                store: &mut self.store,
                clock: &self.clock,
                feedback: &mut self.feedback,
                rng: &mut self.rng,
                config: &self.config,
                policy: self.policy.as_ref(),
            };
            system.init(&mut ctx)?;
            self.systems[i] = system;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        let tick = self.clock.advance();

        for i in 0..self.systems.len() {
            if tick % self.systems[i].cadence_ticks().max(1) != 0 {
                continue;
            }
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                store: &mut self.store,
                clock: &self.clock,
                feedback: &mut self.feedback,
                rng: &mut self.rng,
                config: &self.config,
                policy: self.policy.as_ref(),
            };
            system.tick(&mut ctx)?;
            self.systems[i] = system;
        }
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Resolve a player-initiated ability use against the nearest enemy.
    pub fn player_attack(&mut self, ability: &Ability) -> SimResult<()> {
        let mut ctx = SimContext {
            store: &mut self.store,
            clock: &self.clock,
            feedback: &mut self.feedback,
            rng: &mut self.rng,
            config: &self.config,
            policy: self.policy.as_ref(),
        };
        perception::player_attack(&mut ctx, ability)
    }

    /// Hand a completed patrol route to the enemy spawn system. Returns
    /// false if no spawn system is registered.
    pub fn push_route(&mut self, route: Vec<rq_core::LatLng>) -> bool {
        match self.get_system_mut::<EnemySpawnSystem>() {
            Some(spawn) => {
                spawn.push_route(route);
                true
            }
            None => false,
        }
    }

    /// Take every feedback record produced since the last drain.
    pub fn drain_feedback(&mut self) -> Vec<FloatingFeedback> {
        self.feedback.drain_new()
    }

    /// The entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable access to the entity store.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The feedback log.
    pub fn feedback(&self) -> &FeedbackLog {
        &self.feedback
    }

    /// The run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// The current tick number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Configuration for a simulation run.
///
/// Defaults mirror the observed product behavior: 50 ms movement ticks,
/// 20 micro-steps per patrol segment, a 2 s attack cooldown, and spawn
/// cycles measured in minutes.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Duration of one base tick in milliseconds.
    pub millis_per_tick: u64,
    /// Interpolation sub-steps per patrol segment (sensible range 20-100).
    pub micro_steps_per_segment: u32,
    /// Meters an enemy closes per tick while pursuing.
    pub pursue_step_m: f64,
    /// Default melee cooldown applied to spawned enemies, in milliseconds.
    pub attack_cooldown_ms: u64,
    /// Lifetime of a floating feedback record, in milliseconds.
    pub feedback_ttl_ms: u64,
    /// Ticks between feedback expiry sweeps.
    pub feedback_sweep_ticks: u64,
    /// Ticks between enemy spawn cycles (route fetch cadence).
    pub enemy_spawn_ticks: u64,
    /// Ticks between world item spawns.
    pub item_spawn_ticks: u64,
    /// Radius of the generated patrol circle, in meters.
    pub patrol_radius_m: f64,
    /// Number of waypoints on the patrol circle.
    pub patrol_waypoints: usize,
    /// Enemies placed per completed route.
    pub enemies_per_spawn: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            millis_per_tick: 50,
            micro_steps_per_segment: 20,
            pursue_step_m: 1.0,
            attack_cooldown_ms: 2000,
            feedback_ttl_ms: 1500,
            feedback_sweep_ticks: 4,
            enemy_spawn_ticks: 2400,
            item_spawn_ticks: 3600,
            patrol_radius_m: 100.0,
            patrol_waypoints: 8,
            enemies_per_spawn: 3,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the base tick duration in milliseconds.
    pub fn with_millis_per_tick(mut self, millis: u64) -> Self {
        self.millis_per_tick = millis;
        self
    }

    /// Set the micro-steps per patrol segment, clamped to 20-100.
    pub fn with_micro_steps(mut self, steps: u32) -> Self {
        self.micro_steps_per_segment = steps.clamp(20, 100);
        self
    }

    /// Set the enemy spawn cycle length in ticks.
    pub fn with_enemy_spawn_ticks(mut self, ticks: u64) -> Self {
        self.enemy_spawn_ticks = ticks;
        self
    }

    /// Set the item spawn cycle length in ticks.
    pub fn with_item_spawn_ticks(mut self, ticks: u64) -> Self {
        self.item_spawn_ticks = ticks;
        self
    }

    /// Set the feedback record lifetime in milliseconds.
    pub fn with_feedback_ttl_ms(mut self, ttl: u64) -> Self {
        self.feedback_ttl_ms = ttl;
        self
    }
}

/// Tracks simulation time: a monotonic tick counter and derived wall
/// milliseconds since session start.
///
/// All in-simulation timing (attack cooldowns, feedback expiry) reads this
/// clock rather than the host clock, keeping runs deterministic.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    millis_per_tick: u64,
}

impl SimClock {
    /// Create a clock at tick 0 with the given tick duration.
    pub fn new(millis_per_tick: u64) -> Self {
        Self {
            tick: 0,
            millis_per_tick,
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// The current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed simulation milliseconds since start.
    pub fn now_ms(&self) -> u64 {
        self.tick * self.millis_per_tick
    }

    /// The configured milliseconds per tick.
    pub fn millis_per_tick(&self) -> u64 {
        self.millis_per_tick
    }
}

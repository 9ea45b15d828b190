use rand::rngs::StdRng;

use rq_core::LatLng;
use rq_mechanics::ProgressionPolicy;

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::feedback::{FeedbackKind, FeedbackLog};
use crate::store::EntityStore;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// The entity store.
    pub store: &'a mut EntityStore,
    /// The simulation clock (read-only during a tick).
    pub clock: &'a SimClock,
    /// The feedback log.
    pub feedback: &'a mut FeedbackLog,
    /// The simulation RNG.
    pub rng: &'a mut StdRng,
    /// The run configuration.
    pub config: &'a SimConfig,
    /// The active leveling policy.
    pub policy: &'a dyn ProgressionPolicy,
}

impl SimContext<'_> {
    /// Emit a feedback record at the current time, expiring after the
    /// configured TTL.
    pub fn emit(&mut self, kind: FeedbackKind, position: LatLng, text: impl Into<String>) {
        let now = self.clock.now_ms();
        self.feedback
            .push(kind, position, text, now, now + self.config.feedback_ttl_ms);
    }

    /// The current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Elapsed simulation milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

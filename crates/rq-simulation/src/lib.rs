//! Real-time world simulation for Roamquest.
//!
//! A single-threaded cooperative tick loop over a shared entity store.
//! Four concerns run on independent cadences: enemy movement and combat
//! every tick, enemy spawn placement as routes complete, world item drops
//! on a slow cycle, and floating feedback expiry sweeps. The
//! [`Simulation`] orchestrator owns all state and runs each system to
//! completion before the next, so nothing is ever observed half-updated.
//!
//! Time is simulation time: a tick counter times a fixed tick duration,
//! never the host clock. Together with a seeded RNG this makes whole runs
//! reproducible.

/// The simulation clock.
pub mod clock;
/// Run configuration and defaults.
pub mod config;
/// The per-tick system context.
pub mod context;
/// Simulation error types.
pub mod error;
/// Floating combat feedback records.
pub mod feedback;
/// Enemy AI and combat application.
pub mod perception;
/// The tick-loop orchestrator.
pub mod simulation;
/// Spawn cycles and feedback expiry.
pub mod spawn;
/// The entity store.
pub mod store;
/// The system trait.
pub mod system;

pub use clock::SimClock;
pub use config::SimConfig;
pub use context::SimContext;
pub use error::{SimError, SimResult};
pub use feedback::{FeedbackKind, FeedbackLog, FloatingFeedback};
pub use perception::{AiState, PerceptionSystem};
pub use simulation::Simulation;
pub use spawn::{EnemySpawnSystem, FeedbackExpirySystem, ItemSpawnSystem};
pub use store::{EntityStore, MapItem};
pub use system::System;

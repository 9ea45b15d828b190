//! Async session runtime for Roamquest.
//!
//! Bridges the deterministic simulation in `rq-simulation` to the outside
//! world: platform location, a route service, durable storage, and a
//! feedback display. The simulation never blocks on any of them. A
//! [`Session`] owns a background driver task that ticks the simulation on
//! a fixed interval, fetches patrol routes concurrently, and forwards
//! player commands; stopping the session hands the final simulation back.

/// Provider and session error types.
pub mod error;
/// External provider traits.
pub mod providers;
/// The session driver.
pub mod runtime;

pub use error::{ProviderError, SessionError, SessionResult};
pub use providers::{
    EntityRepository, FeedbackSink, LocationSource, PersistentStore, ProviderFuture,
    RouteProvider, load_reference_data,
};
pub use runtime::{Command, Leveling, Providers, Session, SessionConfig};

//! Core types for Roamquest: a location-based RPG simulation.
//!
//! Holds the data model shared by the mechanics and simulation layers:
//! real-world coordinates and distance geometry, combat profiles, the two
//! tagged entity variants (player character and hostile enemy), abilities as
//! a tagged union of kinds, items, patrol-loop state, and the reference
//! collections loaded at session start. Everything here is pure data and
//! pure functions; randomness and time live upstream.

/// Abilities as a tagged union of kinds.
pub mod ability;
/// Player character and enemy entity variants.
pub mod entity;
/// Error types for the core crate.
pub mod error;
/// Latitude/longitude geometry: distances, circles, bearing steps.
pub mod geo;
/// Item and item kind definitions.
pub mod item;
/// Closed-loop patrol movement state.
pub mod patrol;
/// Combat-facing stats: ability scores, vitals, profiles.
pub mod profile;
/// Reference collections fetched at session start.
pub mod reference;

/// Re-exports of [`ability::Ability`] and [`ability::AbilityKind`].
pub use ability::{Ability, AbilityKind};
/// Re-exports of [`entity::Character`], [`entity::Enemy`], and [`entity::EntityId`].
pub use entity::{Character, Enemy, EntityId};
/// Re-exports of [`error::CoreError`] and [`error::CoreResult`].
pub use error::{CoreError, CoreResult};
/// Re-export of [`geo::LatLng`].
pub use geo::LatLng;
/// Re-exports of [`item::Item`] and [`item::ItemKind`].
pub use item::{Item, ItemKind};
/// Re-export of [`patrol::PatrolState`].
pub use patrol::PatrolState;
/// Re-exports of [`profile::AbilityScores`], [`profile::CombatProfile`], and [`profile::Vitals`].
pub use profile::{AbilityScores, CombatProfile, Vitals};
/// Re-export of [`reference::ReferenceData`].
pub use reference::ReferenceData;

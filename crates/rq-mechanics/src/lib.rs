//! Combat and progression mechanics for Roamquest.
//!
//! Pure rules: dice behind a scriptable seam, one melee resolver producing
//! per-sub-attack detail, and two named leveling policies behind a common
//! trait. Nothing in this crate touches the entity store; the simulation
//! layer applies outcomes and emits player-facing feedback.

/// Melee and ability resolution.
pub mod combat;
/// Dice rolling behind the [`dice::DiceRoller`] seam.
pub mod dice;
/// Experience and leveling policies.
pub mod progression;

/// Re-exports of [`combat::AbilityResolution`], [`combat::AttackOutcome`],
/// [`combat::HealResolution`], and [`combat::MeleeResolution`].
pub use combat::{AbilityResolution, AttackOutcome, HealResolution, MeleeResolution};
/// Re-exports of [`dice::DiceRoller`] and [`dice::ScriptedDice`].
pub use dice::{DiceRoller, ScriptedDice};
/// Re-exports of [`progression::FibonacciProgression`], [`progression::FlatProgression`],
/// [`progression::LevelUp`], and [`progression::ProgressionPolicy`].
pub use progression::{FibonacciProgression, FlatProgression, LevelUp, ProgressionPolicy};

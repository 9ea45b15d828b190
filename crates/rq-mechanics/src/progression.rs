//! Experience accrual and level-up policies.
//!
//! Two incompatible leveling policies were observed in the surrounding
//! product: Fibonacci-threshold growth with +1 resource gains, and flat
//! 100-per-level thresholds with +20/+10 gains. They are modeled as two
//! named policies behind one trait and are never merged; which one ships is
//! an open product question (see DESIGN.md).

use rq_core::profile::CombatProfile;

/// The result of a level gained from an experience award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    /// The level just reached.
    pub new_level: u32,
}

/// A swappable leveling policy.
pub trait ProgressionPolicy: std::fmt::Debug + Send + Sync {
    /// Short identifier for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Award experience, applying at most one level-up. Returns the
    /// level-up if one occurred. A level-up always restores health and mana
    /// to their (possibly raised) maxima.
    fn add_experience(&self, profile: &mut CombatProfile, amount: u64) -> Option<LevelUp>;
}

/// `fib(n)` with `fib(0) = 0`, `fib(1) = 1`. Strictly increasing for n >= 2.
pub fn fib(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

/// Fibonacci-threshold leveling: the experience needed to reach the next
/// level is `fib(level + 1)`. Experience is cumulative and never reset; each
/// level adds one point of maximum health and mana.
#[derive(Debug, Clone, Copy, Default)]
pub struct FibonacciProgression;

impl ProgressionPolicy for FibonacciProgression {
    fn name(&self) -> &'static str {
        "fibonacci"
    }

    fn add_experience(&self, profile: &mut CombatProfile, amount: u64) -> Option<LevelUp> {
        profile.experience += amount;
        let threshold = fib(profile.level + 1);
        if profile.experience < threshold {
            return None;
        }
        profile.level += 1;
        profile.vitals.max_health += 1;
        profile.vitals.max_mana += 1;
        profile.vitals.restore_full();
        Some(LevelUp {
            new_level: profile.level,
        })
    }
}

/// Flat-threshold leveling: `level * 100` experience per level, with the
/// threshold subtracted on level-up (carryover), +20 maximum health and +10
/// maximum mana per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatProgression;

impl ProgressionPolicy for FlatProgression {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn add_experience(&self, profile: &mut CombatProfile, amount: u64) -> Option<LevelUp> {
        profile.experience += amount;
        let threshold = u64::from(profile.level) * 100;
        if profile.experience < threshold {
            return None;
        }
        profile.experience -= threshold;
        profile.level += 1;
        profile.vitals.max_health += 20;
        profile.vitals.max_mana += 10;
        profile.vitals.restore_full();
        Some(LevelUp {
            new_level: profile.level,
        })
    }
}

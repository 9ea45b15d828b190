//! Melee combat resolution.
//!
//! The resolver is pure over its inputs plus the dice seam: it never mutates
//! either profile. The simulation layer applies the outcome (health, loot,
//! experience, removal) and emits floating feedback for every branch,
//! including the early aborts.

use rq_core::ability::{Ability, AbilityKind};
use rq_core::profile::CombatProfile;

use crate::dice::DiceRoller;

/// One sub-attack of a melee resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubAttack {
    /// The d20 roll plus the strength modifier.
    pub attack_roll: i32,
    /// Whether the roll met or exceeded the defender's armor class.
    pub hit: bool,
    /// Damage rolled for this sub-attack (0 on a miss).
    pub damage: u32,
}

/// The aggregate outcome of a resolved melee attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Every sub-attack, in roll order.
    pub sub_attacks: Vec<SubAttack>,
    /// Sum of hit damages. Zero if every sub-attack missed.
    pub total_damage: u32,
    /// True when the total meets or exceeds the defender's current health.
    pub defeated: bool,
}

/// How a melee attack attempt resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum MeleeResolution {
    /// No live defender; resolves as a miss with no state change.
    NoTarget,
    /// The defender is beyond the attacker's effective reach; no resource
    /// cost, no damage.
    OutOfRange {
        /// Effective reach: attacker speed plus ability range, in meters.
        reach_m: f64,
        /// Measured distance to the defender, in meters.
        distance_m: f64,
    },
    /// The attacker cannot pay the ability's mana cost.
    InsufficientMana,
    /// Rolls were made; the outcome carries per-sub-attack detail.
    Resolved(AttackOutcome),
}

/// How a heal attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealResolution {
    /// The caster cannot pay the mana cost.
    InsufficientMana,
    /// The heal lands for the rolled amount.
    Healed {
        /// Health restored, rolled uniformly in `[1, damage_die]`.
        amount: u32,
    },
}

/// How any ability use resolved, one variant per [`AbilityKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityResolution {
    /// A melee attack.
    Melee(MeleeResolution),
    /// A self-heal.
    Heal(HealResolution),
    /// Passive abilities have no active resolution.
    Passive,
}

/// Resolve one melee attack attempt.
///
/// `defender` pairs the target profile with the measured distance in meters;
/// `None` means the attack was made with no live target. The effective reach
/// is `attacker.speed_m + ability.range_m` (movement speed doubling as melee
/// reach, preserved observed behavior). Each of `ability.hits` sub-attacks
/// rolls d20 plus the attacker's strength modifier against the defender's
/// armor class, and on a hit rolls uniform damage in `[1, damage_die]`.
pub fn resolve_melee(
    attacker: &CombatProfile,
    ability: &Ability,
    defender: Option<(&CombatProfile, f64)>,
    dice: &mut dyn DiceRoller,
) -> MeleeResolution {
    let Some((defender, distance_m)) = defender else {
        return MeleeResolution::NoTarget;
    };

    let reach_m = attacker.speed_m + ability.range_m;
    if distance_m > reach_m {
        return MeleeResolution::OutOfRange { reach_m, distance_m };
    }

    if ability.mana_cost > attacker.vitals.mana {
        return MeleeResolution::InsufficientMana;
    }

    let str_mod = attacker.strength_mod();
    let mut sub_attacks = Vec::with_capacity(ability.hits as usize);
    let mut total_damage = 0u32;

    for _ in 0..ability.hits {
        let attack_roll = dice.roll(20) as i32 + str_mod;
        let hit = attack_roll >= defender.armor_class;
        let damage = if hit { dice.roll(ability.damage_die) } else { 0 };
        total_damage += damage;
        sub_attacks.push(SubAttack {
            attack_roll,
            hit,
            damage,
        });
    }

    let defeated = total_damage as i32 >= defender.vitals.health;
    MeleeResolution::Resolved(AttackOutcome {
        sub_attacks,
        total_damage,
        defeated,
    })
}

/// Resolve a self-heal: uniform restoration in `[1, damage_die]` if the
/// caster can pay the mana cost.
pub fn resolve_heal(
    caster: &CombatProfile,
    ability: &Ability,
    dice: &mut dyn DiceRoller,
) -> HealResolution {
    if ability.mana_cost > caster.vitals.mana {
        return HealResolution::InsufficientMana;
    }
    HealResolution::Healed {
        amount: dice.roll(ability.damage_die),
    }
}

/// Dispatch an ability use to the resolver for its kind.
///
/// Exhaustive over [`AbilityKind`]: adding a kind fails compilation here
/// until a resolver exists.
pub fn resolve_ability(
    user: &CombatProfile,
    ability: &Ability,
    defender: Option<(&CombatProfile, f64)>,
    dice: &mut dyn DiceRoller,
) -> AbilityResolution {
    match ability.kind {
        AbilityKind::Melee => AbilityResolution::Melee(resolve_melee(user, ability, defender, dice)),
        AbilityKind::Heal => AbilityResolution::Heal(resolve_heal(user, ability, dice)),
        AbilityKind::Passive => AbilityResolution::Passive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rq_core::profile::{AbilityScores, Vitals};

    fn attacker(strength: i32, speed_m: f64) -> CombatProfile {
        let scores = AbilityScores {
            strength,
            ..AbilityScores::default()
        };
        CombatProfile::new("Attacker", scores, Vitals::new(100, 50)).with_speed(speed_m)
    }

    fn defender(armor_class: i32, health: i32) -> CombatProfile {
        CombatProfile::new("Defender", AbilityScores::default(), Vitals::new(health, 0))
            .with_armor_class(armor_class)
    }

    #[test]
    fn no_target_is_a_miss() {
        let a = attacker(14, 30.0);
        let ability = Ability::melee("Strike", 6, 5.0, 2000);
        let mut dice = ScriptedDice::new([]);
        assert_eq!(
            resolve_melee(&a, &ability, None, &mut dice),
            MeleeResolution::NoTarget
        );
    }

    #[test]
    fn out_of_range_rolls_nothing() {
        // Distance 100, speed 30, range 5: effective reach 35 < 100.
        let a = attacker(14, 30.0);
        let d = defender(3, 4);
        let ability = Ability::melee("Strike", 6, 5.0, 2000);
        let mut dice = ScriptedDice::new([20, 6]);
        let res = resolve_melee(&a, &ability, Some((&d, 100.0)), &mut dice);
        assert_eq!(
            res,
            MeleeResolution::OutOfRange {
                reach_m: 35.0,
                distance_m: 100.0
            }
        );
        // No dice consumed on an abort.
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn scripted_kill_scenario() {
        // STR 14 (+2), hits 1, damage die 6, range 5; defender AC 3, health
        // 4, at 4 m. Hit roll 10 and damage roll 4 defeat the defender.
        let a = attacker(14, 30.0);
        let d = defender(3, 4);
        let ability = Ability::melee("Strike", 6, 5.0, 2000);
        let mut dice = ScriptedDice::new([10, 4]);
        let res = resolve_melee(&a, &ability, Some((&d, 4.0)), &mut dice);
        let MeleeResolution::Resolved(outcome) = res else {
            panic!("expected resolved outcome, got {res:?}");
        };
        assert_eq!(outcome.sub_attacks.len(), 1);
        assert_eq!(outcome.sub_attacks[0].attack_roll, 12);
        assert!(outcome.sub_attacks[0].hit);
        assert_eq!(outcome.total_damage, 4);
        assert!(outcome.defeated);
    }

    #[test]
    fn missed_sub_attacks_deal_zero() {
        let a = attacker(10, 1.5);
        let d = defender(18, 10);
        let ability = Ability::melee("Strike", 6, 0.5, 2000).with_hits(2);
        let mut dice = ScriptedDice::new([5, 3]);
        let res = resolve_melee(&a, &ability, Some((&d, 1.0)), &mut dice);
        let MeleeResolution::Resolved(outcome) = res else {
            panic!("expected resolved outcome");
        };
        assert_eq!(outcome.total_damage, 0);
        assert!(!outcome.defeated);
        assert!(outcome.sub_attacks.iter().all(|s| !s.hit && s.damage == 0));
    }

    #[test]
    fn insufficient_mana_aborts() {
        let mut a = attacker(14, 30.0);
        a.vitals.mana = 1;
        let d = defender(10, 10);
        let ability = Ability::melee("Arc Slash", 6, 5.0, 2000).with_mana_cost(5);
        let mut dice = ScriptedDice::new([20]);
        let res = resolve_melee(&a, &ability, Some((&d, 2.0)), &mut dice);
        assert_eq!(res, MeleeResolution::InsufficientMana);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn heal_rolls_within_die() {
        let a = attacker(10, 1.5);
        let ability = Ability::heal("Mend", 8, 3);
        let mut dice = ScriptedDice::new([6]);
        assert_eq!(
            resolve_heal(&a, &ability, &mut dice),
            HealResolution::Healed { amount: 6 }
        );
    }

    #[test]
    fn ability_dispatch_is_exhaustive() {
        let a = attacker(10, 1.5);
        let mut dice = ScriptedDice::new([4]);
        let passive = Ability {
            name: "Toughness".into(),
            kind: AbilityKind::Passive,
            damage_die: 0,
            hits: 0,
            range_m: 0.0,
            mana_cost: 0,
            cooldown_ms: 0,
        };
        assert_eq!(
            resolve_ability(&a, &passive, None, &mut dice),
            AbilityResolution::Passive
        );
        let heal = Ability::heal("Mend", 8, 0);
        assert!(matches!(
            resolve_ability(&a, &heal, None, &mut dice),
            AbilityResolution::Heal(HealResolution::Healed { .. })
        ));
    }

    proptest! {
        #[test]
        fn damage_bounded_by_hits_times_die(seed in 0u64..1000, hits in 1u32..6, die in 1u32..13) {
            let a = attacker(14, 30.0);
            let d = defender(10, 1000);
            let ability = Ability::melee("Strike", die, 5.0, 2000).with_hits(hits);
            let mut rng = StdRng::seed_from_u64(seed);
            let res = resolve_melee(&a, &ability, Some((&d, 1.0)), &mut rng);
            let MeleeResolution::Resolved(outcome) = res else {
                panic!("expected resolved outcome");
            };
            prop_assert!(outcome.total_damage <= hits * die);
            prop_assert_eq!(outcome.sub_attacks.len(), hits as usize);
        }
    }
}

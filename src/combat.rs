//! Opposed dice-pool combat.
//!
//! Attacker and defender each roll one die per point of melee or defense.
//! Every die shows 0, 1 or 2 with equal odds. The attack lands when its total
//! beats the defense total, and the difference is the damage dealt.

use serde::Serialize;

use crate::entity::{Attribute, CreatureId};
use crate::util::random::Random;
use crate::world::{World, WorldError, WorldEvent};

pub const DIE_FACES: [i32; 6] = [0, 0, 1, 1, 2, 2];

pub fn roll_die(random: &Random) -> i32 {
    DIE_FACES[random.index(DIE_FACES.len())]
}

/// One die per point; non-positive counts roll nothing.
pub fn roll_pool(count: i32, random: &Random) -> Vec<i32> {
    (0..count.max(0)).map(|_| roll_die(random)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackRoll {
    pub attack_dice: Vec<i32>,
    pub defense_dice: Vec<i32>,
}

impl AttackRoll {
    pub fn roll(melee: i32, defense: i32, random: &Random) -> Self {
        Self {
            attack_dice: roll_pool(melee, random),
            defense_dice: roll_pool(defense, random),
        }
    }

    pub fn attack_total(&self) -> i32 {
        self.attack_dice.iter().sum()
    }

    pub fn defense_total(&self) -> i32 {
        self.defense_dice.iter().sum()
    }

    pub fn success(&self) -> bool {
        self.attack_total() > self.defense_total()
    }

    pub fn damage(&self) -> i32 {
        (self.attack_total() - self.defense_total()).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub attack_dice: Vec<i32>,
    pub defense_dice: Vec<i32>,
    pub success: bool,
    pub damage: i32,
    pub health_lost: i32,
    /// Damage beyond what the defender had left.
    pub overkill: i32,
    pub killed: bool,
}

impl AttackReport {
    pub fn new(roll: AttackRoll, health_before: i32, health_lost: i32) -> Self {
        let success = roll.success();
        let damage = roll.damage();
        Self {
            success,
            damage,
            health_lost,
            overkill: damage - health_lost,
            killed: health_lost > 0 && health_lost >= health_before,
            attack_dice: roll.attack_dice,
            defense_dice: roll.defense_dice,
        }
    }
}

/// Roll `attacker`'s melee against `defender`'s defense, apply the damage and
/// notify the defender's scripts. Death is handled by the scheduler after the
/// action completes.
pub fn resolve_attack(
    world: &mut World,
    attacker: CreatureId,
    defender: CreatureId,
) -> Result<AttackReport, WorldError> {
    let melee = world.attribute(attacker, Attribute::Melee)?;
    let defense = world.attribute(defender, Attribute::Defense)?;
    let roll = AttackRoll::roll(melee, defense, world.random());

    let health_before = world.creature(defender)?.health;
    let health_lost = if roll.success() {
        world.creature_mut(defender)?.take_damage(roll.damage())
    } else {
        0
    };
    let report = AttackReport::new(roll, health_before, health_lost);

    tracing::debug!(
        attacker = attacker.0,
        defender = defender.0,
        damage = report.damage,
        health_lost = report.health_lost,
        "Attack resolved"
    );
    world.emit(WorldEvent::Attack {
        attacker,
        defender,
        report: report.clone(),
    });
    world.notify_defend(defender, attacker, &report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_are_balanced() {
        let random = Random::new(11);
        let mut counts = [0; 3];
        for _ in 0..3000 {
            counts[roll_die(&random) as usize] += 1;
        }
        for (face, n) in counts.iter().enumerate() {
            assert!(*n > 850 && *n < 1150, "Face {} rolled {} times", face, n);
        }
    }

    #[test]
    fn empty_pools_for_non_positive_counts() {
        let random = Random::new(1);
        assert!(roll_pool(0, &random).is_empty());
        assert!(roll_pool(-3, &random).is_empty());
        assert_eq!(roll_pool(4, &random).len(), 4);
    }

    #[test]
    fn zero_defense_means_damage_equals_attack_total() {
        let random = Random::new(5);
        for _ in 0..50 {
            let roll = AttackRoll::roll(3, 0, &random);
            assert_eq!(roll.attack_dice.len(), 3);
            assert!(roll.defense_dice.is_empty());
            assert_eq!(roll.damage(), roll.attack_total());
            assert_eq!(roll.success(), roll.attack_total() > 0);
        }
    }

    #[test]
    fn report_splits_damage_into_loss_and_overkill() {
        let roll = AttackRoll {
            attack_dice: vec![2, 2, 1],
            defense_dice: vec![1],
        };
        assert!(roll.success());
        let report = AttackReport::new(roll, 3, 3);
        assert_eq!(report.damage, 4);
        assert_eq!(report.health_lost, 3);
        assert_eq!(report.overkill, 1);
        assert!(report.killed);
    }

    #[test]
    fn tie_is_a_miss() {
        let roll = AttackRoll {
            attack_dice: vec![1, 1],
            defense_dice: vec![2],
        };
        assert!(!roll.success());
        assert_eq!(roll.damage(), 0);
        let report = AttackReport::new(roll, 5, 0);
        assert!(!report.killed);
        assert_eq!(report.overkill, 0);
    }
}

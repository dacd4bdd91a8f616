use crate::behavior::{chase_and_attack, Behavior, Decision};
use crate::entity::CreatureId;
use crate::sensor;
use crate::world::World;

/// Strike back at whoever last attacked this creature, as recorded by its
/// retaliation sensor.
#[derive(Default)]
pub struct Retaliate {
    target: Option<CreatureId>,
    engaged: Option<Box<dyn Behavior>>,
}

impl Retaliate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for Retaliate {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let aggressor = sensor::last_aggressor(world, actor)?
            .filter(|id| world.find_creature(*id).is_some());
        let Some(aggressor) = aggressor else {
            self.target = None;
            self.engaged = None;
            return Ok(None);
        };
        if self.target != Some(aggressor) {
            self.target = Some(aggressor);
            self.engaged = Some(Box::new(chase_and_attack(aggressor)));
        }
        match self.engaged.as_mut() {
            Some(engaged) => engaged.decide(actor, world),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::resolve_attack;
    use crate::entity::{CreatureType, Faction};
    use crate::sensor::RetaliationSensor;
    use crate::testing::{room, spawn, HERO};
    use crate::util::table::RollMany;

    static BADGER: CreatureType = CreatureType {
        key: "test_badger",
        name: "badger",
        glyph: 'b',
        faction: Faction::Wildlife,
        defense: 5,
        melee: 1,
        health_max: 30,
        speed: 100,
        behavior: None,
        scripts: &[&RetaliationSensor],
        kit: &[],
        loot: RollMany::empty(),
    };

    #[test]
    fn peaceful_until_attacked() {
        let mut world = room(5, 5);
        let badger = spawn(&mut world, &BADGER, 1, 1);
        let hero = spawn(&mut world, &HERO, 2, 1);
        let mut b = Retaliate::new();
        assert!(b.decide(badger, &world).unwrap().is_none());

        resolve_attack(&mut world, hero, badger).unwrap();
        let action = b.decide(badger, &world).unwrap().expect("should strike back");
        assert!(format!("{:?}", action).contains("Attack"));
    }

    #[test]
    fn forgets_a_vanished_aggressor() {
        let mut world = room(5, 5);
        let badger = spawn(&mut world, &BADGER, 1, 1);
        let hero = spawn(&mut world, &HERO, 2, 1);
        resolve_attack(&mut world, hero, badger).unwrap();
        world.remove_creature(hero);
        let mut b = Retaliate::new();
        assert!(b.decide(badger, &world).unwrap().is_none());
    }
}

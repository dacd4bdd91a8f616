use crate::behavior::{chase_and_attack, Behavior, Decision};
use crate::entity::CreatureId;
use crate::sensor;
use crate::util::geometry::{manhattan, Coord};
use crate::world::{World, WorldError};

type GuardPoint = Box<dyn Fn(CreatureId, &World) -> Result<Coord, WorldError>>;

/// Attack hostiles that come within `radius` of a guarded point.
///
/// Candidates come from the creature's nearby-creatures sensor. A target is
/// dropped as soon as it leaves that list or strays out of the radius, and a
/// new one is chosen at random from whoever qualifies.
pub struct Guard {
    radius: i32,
    point: GuardPoint,
    target: Option<CreatureId>,
    engaged: Option<Box<dyn Behavior>>,
}

impl Guard {
    pub fn new(radius: i32, point: GuardPoint) -> Self {
        Self {
            radius,
            point,
            target: None,
            engaged: None,
        }
    }

    /// Guard the spot the creature was spawned on.
    pub fn around_home(radius: i32) -> Self {
        Self::new(radius, Box::new(|actor: CreatureId, world: &World| sensor::home(world, actor)))
    }

    /// Guard wherever the creature currently stands.
    pub fn around_self(radius: i32) -> Self {
        Self::new(
            radius,
            Box::new(|actor: CreatureId, world: &World| {
                world.creature(actor).map(|c| c.position)
            }),
        )
    }

    pub fn target(&self) -> Option<CreatureId> {
        self.target
    }
}

impl Behavior for Guard {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let nearby = sensor::nearby_creatures(world, actor)?;
        let center = (self.point)(actor, world)?;
        let in_range = |id: CreatureId| {
            world
                .find_creature(id)
                .is_some_and(|c| manhattan(c.position, center) <= self.radius)
        };

        if let Some(target) = self.target {
            if !(nearby.contains(&target) && in_range(target)) {
                self.target = None;
                self.engaged = None;
            }
        }

        if self.target.is_none() {
            let me = world.creature(actor)?;
            let candidates: Vec<CreatureId> = nearby
                .iter()
                .copied()
                .filter(|id| world.find_creature(*id).is_some_and(|c| me.is_hostile_to(c)))
                .filter(|id| in_range(*id))
                .collect();
            let Some(&target) = world.random().pick(&candidates) else {
                return Ok(None);
            };
            self.target = Some(target);
            self.engaged = Some(Box::new(chase_and_attack(target)));
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
    use crate::entity::{CreatureType, Faction};
    use crate::sensor::{HomeSensor, NearbyCreaturesSensor};
    use crate::testing::{room, spawn, HERO};
    use crate::util::table::RollMany;

    static SENTRY: CreatureType = CreatureType {
        key: "test_sentry",
        name: "sentry",
        glyph: 'S',
        faction: Faction::Monster,
        defense: 0,
        melee: 1,
        health_max: 5,
        speed: 100,
        behavior: None,
        scripts: &[&HomeSensor, &NearbyCreaturesSensor { radius: 10 }],
        kit: &[],
        loot: RollMany::empty(),
    };

    fn sense(world: &mut World, id: CreatureId) {
        for script in SENTRY.scripts {
            script.on_turn_start(id, world).unwrap();
        }
    }

    #[test]
    fn engages_hostile_inside_radius_only() {
        let mut world = room(20, 3);
        let sentry = spawn(&mut world, &SENTRY, 0, 1);
        let hero = spawn(&mut world, &HERO, 8, 1);
        let mut guard = Guard::around_home(4);

        sense(&mut world, sentry);
        assert!(guard.decide(sentry, &world).unwrap().is_none());
        assert_eq!(guard.target(), None);

        world.move_creature(hero, Coord::new(3, 1)).unwrap();
        sense(&mut world, sentry);
        assert!(guard.decide(sentry, &world).unwrap().is_some());
        assert_eq!(guard.target(), Some(hero));

        world.move_creature(hero, Coord::new(9, 1)).unwrap();
        sense(&mut world, sentry);
        assert!(guard.decide(sentry, &world).unwrap().is_none());
        assert_eq!(guard.target(), None, "Target outside the radius is dropped");
    }

    #[test]
    fn ignores_friendly_creatures() {
        let mut world = room(6, 3);
        let sentry = spawn(&mut world, &SENTRY, 0, 1);
        spawn(&mut world, &SENTRY, 2, 1);
        let mut guard = Guard::around_self(5);
        sense(&mut world, sentry);
        assert!(guard.decide(sentry, &world).unwrap().is_none());
    }

    #[test]
    fn requires_nearby_sensor() {
        let mut world = room(4, 4);
        let hero = spawn(&mut world, &HERO, 1, 1);
        let mut guard = Guard::around_self(3);
        assert!(matches!(
            guard.decide(hero, &world),
            Err(WorldError::MissingSensorData { .. })
        ));
    }
}

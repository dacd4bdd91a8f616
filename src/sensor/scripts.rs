use crate::combat::AttackReport;
use crate::entity::CreatureId;
use crate::map::sight::visible_cells;
use crate::sensor::{
    nearby_creatures, update, write, Age, Facing, Home, LastAggressor, NearbyCreatures, Startled,
    Visible,
};
use crate::util::geometry::{chebyshev, manhattan, Coord, Direction};
use crate::world::{CreatureScript, World, WorldError};

/// Turns after a scare during which nearby creatures cannot startle again.
const STARTLE_CALM_TURNS: u32 = 5;
/// An aggressor farther away than this is forgotten.
const RETALIATION_RANGE: i32 = 12;

/// Last direction of travel. Starts facing south.
pub struct FacingSensor;

impl CreatureScript for FacingSensor {
    fn name(&self) -> &'static str {
        "facing"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        write(world, creature, Facing(Direction::South))
    }

    fn on_move(
        &self,
        creature: CreatureId,
        from: Coord,
        to: Coord,
        world: &mut World,
    ) -> Result<(), WorldError> {
        match Direction::from_delta(to - from) {
            Some(direction) => update::<Facing>(world, creature, |f| f.0 = direction),
            None => Ok(()),
        }
    }
}

/// Completed turns since the creature appeared.
pub struct AgeSensor;

impl CreatureScript for AgeSensor {
    fn name(&self) -> &'static str {
        "age"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        write(world, creature, Age(0))
    }

    fn on_turn_end(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        update::<Age>(world, creature, |a| a.0 += 1)
    }
}

/// Remembers where the creature was spawned.
pub struct HomeSensor;

impl CreatureScript for HomeSensor {
    fn name(&self) -> &'static str {
        "home"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        let position = world.creature(creature)?.position;
        write(world, creature, Home(position))
    }
}

/// Field of view, refreshed at turn start and after every step.
pub struct VisibilitySensor {
    pub radius: i32,
}

impl VisibilitySensor {
    fn refresh(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        let position = world.creature(creature)?.position;
        let cells = visible_cells(world.map(), position, self.radius);
        write(world, creature, Visible(cells))
    }
}

impl CreatureScript for VisibilitySensor {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        self.refresh(creature, world)
    }

    fn on_turn_start(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        self.refresh(creature, world)
    }

    fn on_move(
        &self,
        creature: CreatureId,
        _from: Coord,
        _to: Coord,
        world: &mut World,
    ) -> Result<(), WorldError> {
        self.refresh(creature, world)
    }
}

/// Other creatures within `radius`, nearest first. When the creature also
/// carries a visibility sensor (listed earlier), only creatures it can see count.
pub struct NearbyCreaturesSensor {
    pub radius: i32,
}

impl CreatureScript for NearbyCreaturesSensor {
    fn name(&self) -> &'static str {
        "nearby creatures"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        write(world, creature, NearbyCreatures::default())
    }

    fn on_turn_start(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        let me = world.creature(creature)?;
        let origin = me.position;
        let seen = me.script_data.get::<Visible>();
        let mut found: Vec<(i32, CreatureId)> = world
            .creatures()
            .filter(|c| c.id != creature)
            .filter(|c| chebyshev(c.position, origin) <= self.radius)
            .filter(|c| seen.is_none_or(|v| v.0.contains(&c.position)))
            .map(|c| (manhattan(c.position, origin), c.id))
            .collect();
        found.sort();
        let ids = found.into_iter().map(|(_, id)| id).collect();
        write(world, creature, NearbyCreatures(ids))
    }
}

/// Records scares: being attacked, or (with `sense_radius`) a feared creature
/// coming close. Sensing needs a nearby-creatures sensor listed earlier.
pub struct StartleSensor {
    pub sense_radius: Option<i32>,
}

fn startle(world: &mut World, creature: CreatureId, threat: Coord) -> Result<(), WorldError> {
    update::<Startled>(world, creature, |s| {
        s.threat = Some(threat);
        s.sequence += 1;
        s.calm = STARTLE_CALM_TURNS;
    })
}

impl CreatureScript for StartleSensor {
    fn name(&self) -> &'static str {
        "startle"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        write(world, creature, Startled::default())
    }

    fn on_turn_start(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        let Some(radius) = self.sense_radius else {
            return Ok(());
        };
        let me = world.creature(creature)?;
        let calm = me.script_data.get::<Startled>().is_some_and(|s| s.calm > 0);
        if calm {
            return Ok(());
        }
        let (origin, faction) = (me.position, me.faction());
        let threat = nearby_creatures(world, creature)?
            .iter()
            .filter_map(|id| world.find_creature(*id))
            .find(|c| faction.fears(c.faction()) && manhattan(c.position, origin) <= radius)
            .map(|c| c.position);
        match threat {
            Some(at) => startle(world, creature, at),
            None => Ok(()),
        }
    }

    fn on_turn_end(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        update::<Startled>(world, creature, |s| s.calm = s.calm.saturating_sub(1))
    }

    fn on_defend(
        &self,
        creature: CreatureId,
        attacker: CreatureId,
        _report: &AttackReport,
        world: &mut World,
    ) -> Result<(), WorldError> {
        let at = world.creature(attacker)?.position;
        startle(world, creature, at)
    }
}

/// Remembers who attacked last, until they die or wander out of range.
pub struct RetaliationSensor;

impl CreatureScript for RetaliationSensor {
    fn name(&self) -> &'static str {
        "retaliation"
    }

    fn on_create(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        write(world, creature, LastAggressor::default())
    }

    fn on_turn_start(&self, creature: CreatureId, world: &mut World) -> Result<(), WorldError> {
        let origin = world.creature(creature)?.position;
        let Some(aggressor) = crate::sensor::last_aggressor(world, creature)? else {
            return Ok(());
        };
        let in_range = world
            .find_creature(aggressor)
            .is_some_and(|c| manhattan(c.position, origin) <= RETALIATION_RANGE);
        if in_range {
            return Ok(());
        }
        write(world, creature, LastAggressor(None))
    }

    fn on_defend(
        &self,
        creature: CreatureId,
        attacker: CreatureId,
        _report: &AttackReport,
        world: &mut World,
    ) -> Result<(), WorldError> {
        write(world, creature, LastAggressor(Some(attacker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CreatureType, Faction};
    use crate::map::Terrain;
    use crate::sensor::{self, SensorState};
    use crate::testing::{room, spawn, HERO};
    use crate::util::table::RollMany;

    static DEER: CreatureType = CreatureType {
        key: "test_deer",
        name: "deer",
        glyph: 'd',
        faction: Faction::Wildlife,
        defense: 0,
        melee: 0,
        health_max: 5,
        speed: 100,
        behavior: None,
        scripts: &[
            &FacingSensor,
            &AgeSensor,
            &HomeSensor,
            &VisibilitySensor { radius: 6 },
            &NearbyCreaturesSensor { radius: 6 },
            &StartleSensor {
                sense_radius: Some(3),
            },
            &RetaliationSensor,
        ],
        kit: &[],
        loot: RollMany::empty(),
    };

    static BARE: CreatureType = CreatureType {
        key: "test_bare",
        name: "stone",
        glyph: 's',
        faction: Faction::Neutral,
        defense: 0,
        melee: 0,
        health_max: 5,
        speed: 100,
        behavior: None,
        scripts: &[],
        kit: &[],
        loot: RollMany::empty(),
    };

    #[test]
    fn create_hooks_initialize_every_sensor() {
        let mut world = room(10, 10);
        let deer = spawn(&mut world, &DEER, 4, 4);
        assert_eq!(sensor::facing(&world, deer).unwrap(), Direction::South);
        assert_eq!(sensor::age(&world, deer).unwrap(), 0);
        assert_eq!(sensor::home(&world, deer).unwrap(), Coord::new(4, 4));
        assert!(sensor::visible(&world, deer).unwrap().contains(&Coord::new(6, 6)));
        assert!(sensor::nearby_creatures(&world, deer).unwrap().is_empty());
        assert_eq!(sensor::startled(&world, deer).unwrap().sequence, 0);
        assert_eq!(sensor::last_aggressor(&world, deer).unwrap(), None);
    }

    #[test]
    fn missing_sensor_fails_loudly() {
        let mut world = room(5, 5);
        let stone = spawn(&mut world, &BARE, 1, 1);
        let err = sensor::home(&world, stone).unwrap_err();
        assert_eq!(
            err,
            WorldError::MissingSensorData {
                creature: stone,
                sensor: Home::NAME
            }
        );
    }

    #[test]
    fn facing_follows_movement() {
        let mut world = room(10, 10);
        let deer = spawn(&mut world, &DEER, 4, 4);
        world.move_creature(deer, Coord::new(3, 4)).unwrap();
        assert_eq!(sensor::facing(&world, deer).unwrap(), Direction::West);
        world.move_creature(deer, Coord::new(3, 3)).unwrap();
        assert_eq!(sensor::facing(&world, deer).unwrap(), Direction::North);
    }

    #[test]
    fn nearby_lists_visible_creatures_nearest_first() {
        let mut world = room(12, 12);
        let deer = spawn(&mut world, &DEER, 1, 1);
        let far = spawn(&mut world, &BARE, 5, 1);
        let near = spawn(&mut world, &BARE, 2, 2);
        let hidden = spawn(&mut world, &BARE, 1, 5);
        world.set_terrain(Coord::new(1, 3), Terrain::Wall);
        world.set_terrain(Coord::new(0, 3), Terrain::Wall);
        world.set_terrain(Coord::new(2, 3), Terrain::Wall);

        VisibilitySensor { radius: 6 }.on_turn_start(deer, &mut world).unwrap();
        NearbyCreaturesSensor { radius: 6 }.on_turn_start(deer, &mut world).unwrap();

        let nearby = sensor::nearby_creatures(&world, deer).unwrap();
        assert_eq!(nearby, &[near, far]);
        assert!(!nearby.contains(&hidden));
    }

    #[test]
    fn feared_creature_within_sense_radius_startles() {
        let mut world = room(12, 12);
        let deer = spawn(&mut world, &DEER, 5, 5);
        spawn(&mut world, &HERO, 7, 5);
        for script in DEER.scripts {
            script.on_turn_start(deer, &mut world).unwrap();
        }
        let state = sensor::startled(&world, deer).unwrap();
        assert_eq!(state.sequence, 1);
        assert_eq!(state.threat, Some(Coord::new(7, 5)));

        // Calm period: the same threat does not startle again right away.
        for script in DEER.scripts {
            script.on_turn_start(deer, &mut world).unwrap();
        }
        assert_eq!(sensor::startled(&world, deer).unwrap().sequence, 1);
    }

    #[test]
    fn being_attacked_records_aggressor_and_startles() {
        let mut world = room(6, 6);
        let deer = spawn(&mut world, &DEER, 2, 2);
        let hero = spawn(&mut world, &HERO, 3, 2);
        crate::combat::resolve_attack(&mut world, hero, deer).unwrap();
        assert_eq!(sensor::last_aggressor(&world, deer).unwrap(), Some(hero));
        assert_eq!(sensor::startled(&world, deer).unwrap().sequence, 1);

        world.remove_creature(hero);
        RetaliationSensor.on_turn_start(deer, &mut world).unwrap();
        assert_eq!(sensor::last_aggressor(&world, deer).unwrap(), None);
    }
}

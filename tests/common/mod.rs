#![allow(dead_code)]

use cavern::action::{Action, ActionOutcome};
use cavern::behavior::Decision;
use cavern::entity::{CreatureId, CreatureType, Faction};
use cavern::map::Terrain;
use cavern::util::geometry::{Coord, Rect};
use cavern::util::table::RollMany;
use cavern::world::{World, WorldError, WorldSettings, ACTION_COST};

/// Number of actions a creature has taken, kept in its script data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally(pub u32);

/// Counts itself on the actor.
#[derive(Debug)]
pub struct Count(pub CreatureId);

impl Action for Count {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        let data = &mut world.creature_mut(self.0)?.script_data;
        let next = data.get::<Tally>().map_or(1, |t| t.0 + 1);
        data.insert(Tally(next));
        Ok(ActionOutcome::done())
    }
}

/// Drops the target's health to zero and lets the scheduler do the rest.
#[derive(Debug)]
pub struct Smite(pub CreatureId);

impl Action for Smite {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        world.creature_mut(self.0)?.health = 0;
        Ok(ActionOutcome::done())
    }
}

pub fn counting(actor: CreatureId, _world: &World) -> Decision {
    Ok(Some(Box::new(Count(actor))))
}

fn counting_behavior() -> Box<dyn cavern::behavior::Behavior> {
    Box::new(counting)
}

pub const fn kind(key: &'static str, faction: Faction, speed: i32) -> CreatureType {
    CreatureType {
        key,
        name: key,
        glyph: 'c',
        faction,
        defense: 0,
        melee: 1,
        health_max: 10,
        speed,
        behavior: Some(counting_behavior),
        scripts: &[],
        kit: &[],
        loot: RollMany::empty(),
    }
}

pub static SLOW: CreatureType = kind("slow", Faction::Neutral, 50);
pub static NORMAL: CreatureType = kind("normal", Faction::Neutral, 100);
pub static FAST: CreatureType = kind("fast", Faction::Neutral, 200);

pub static HERO: CreatureType = CreatureType {
    behavior: None,
    faction: Faction::Player,
    melee: 3,
    health_max: 20,
    ..kind("hero", Faction::Player, 100)
};

pub static OGRE: CreatureType = CreatureType {
    behavior: None,
    faction: Faction::Monster,
    melee: 3,
    ..kind("ogre", Faction::Monster, 100)
};

/// Armored and frail: every attack is a real contest, and three points of
/// damage finish it.
pub static KNIGHT: CreatureType = CreatureType {
    behavior: None,
    defense: 3,
    health_max: 3,
    ..kind("knight", Faction::Monster, 100)
};

pub fn room(width: i32, height: i32) -> World {
    let mut world = World::new(21, WorldSettings::default());
    for c in Rect::new(0, 0, width, height).cells() {
        world.set_terrain(c, Terrain::Floor);
    }
    world
}

/// Spawn a creature with enough initiative to act on the very next pass.
pub fn ready(world: &mut World, kind: &'static CreatureType, x: i32, y: i32) -> CreatureId {
    let id = world.add_creature(kind, Coord::new(x, y)).unwrap();
    world.creature_mut(id).unwrap().initiative = ACTION_COST;
    id
}

pub fn tally(world: &World, id: CreatureId) -> u32 {
    world
        .find_creature(id)
        .and_then(|c| c.script_data.get::<Tally>())
        .map_or(0, |t| t.0)
}

/// Every living creature stands where the map says it does.
pub fn assert_positions_agree(world: &World) {
    for creature in world.creatures() {
        assert_eq!(
            world.map().creature(creature.position),
            Some(creature.id),
            "Map and creature {} disagree at {:?}",
            creature.id.0,
            creature.position
        );
    }
}

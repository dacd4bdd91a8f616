//! Fixtures shared by unit tests.

use crate::entity::{CreatureId, CreatureType, Faction};
use crate::map::Terrain;
use crate::util::geometry::{Coord, Rect};
use crate::util::table::RollMany;
use crate::world::{World, WorldSettings};

pub(crate) static HERO: CreatureType = CreatureType {
    key: "test_hero",
    name: "hero",
    glyph: '@',
    faction: Faction::Player,
    defense: 1,
    melee: 2,
    health_max: 20,
    speed: 100,
    behavior: None,
    scripts: &[],
    kit: &[],
    loot: RollMany::empty(),
};

pub(crate) static BRUTE: CreatureType = CreatureType {
    key: "test_brute",
    name: "brute",
    glyph: 'B',
    faction: Faction::Monster,
    defense: 0,
    melee: 3,
    health_max: 10,
    speed: 100,
    behavior: None,
    scripts: &[],
    kit: &[],
    loot: RollMany::empty(),
};

/// A world whose map is an open floor rectangle at the origin.
pub(crate) fn room(width: i32, height: i32) -> World {
    let mut world = World::new(7, WorldSettings::default());
    for c in Rect::new(0, 0, width, height).cells() {
        world.set_terrain(c, Terrain::Floor);
    }
    world
}

pub(crate) fn spawn(world: &mut World, kind: &'static CreatureType, x: i32, y: i32) -> CreatureId {
    world
        .add_creature(kind, Coord::new(x, y))
        .expect("spawn cell should be free")
}

mod common;

use cavern::action::Interact;
use cavern::entity::catalog;
use cavern::map::Terrain;
use cavern::world::{zone, UpdateStatus, World, WorldError, WorldEvent, WorldSettings, ACTION_COST};

use common::assert_positions_agree;

fn layout(world: &World) -> Vec<(&'static str, i32, i32)> {
    world
        .creatures()
        .map(|c| (c.kind.key, c.position.x, c.position.y))
        .collect()
}

#[test]
fn every_zone_builds_a_consistent_world() {
    for id in zone::ids() {
        let world = World::create(id, 17, WorldSettings::default()).unwrap();
        assert_eq!(world.zone().map(|z| z.id), Some(id));
        let player = world.player().expect("player placed");
        let start = world.creature(player).unwrap().position;
        assert!(world.map().terrain(start).traversable(), "{} start is not walkable", id);
        assert_positions_agree(&world);
    }
}

#[test]
fn same_seed_same_zone() {
    let a = World::create("depths", 99, WorldSettings::default()).unwrap();
    let b = World::create("depths", 99, WorldSettings::default()).unwrap();
    assert_eq!(layout(&a), layout(&b));
    assert_ne!(a.id, b.id);
}

#[test]
fn unknown_zone_is_an_error() {
    let err = World::create("moon", 1, WorldSettings::default()).unwrap_err();
    assert_eq!(err, WorldError::UnknownZone("moon".to_string()));

    let mut world = World::create("glade", 1, WorldSettings::default()).unwrap();
    assert!(world.load_zone("moon").is_err());
}

#[test]
fn load_zone_keeps_player_and_belongings() {
    let mut world = World::create("glade", 4, WorldSettings::default()).unwrap();
    let player = world.player().unwrap();
    let carried = world.creature(player).unwrap().belongings();
    assert!(!carried.is_empty());
    world.drain_events();

    world.load_zone("depths").unwrap();
    world.update().unwrap();

    assert_eq!(world.zone().map(|z| z.id), Some("depths"));
    assert_eq!(world.player(), Some(player));
    assert_eq!(world.creature(player).unwrap().belongings(), carried);
    for item in carried {
        assert!(world.item(item).is_ok());
    }
    assert!(world
        .drain_events()
        .iter()
        .any(|e| matches!(e, WorldEvent::ZoneEntered { zone: "depths", .. })));
    assert_positions_agree(&world);
}

#[test]
fn taking_the_stairs_changes_zone_on_the_next_update() {
    let mut world = World::create("glade", 8, WorldSettings::default()).unwrap();
    let player = world.player().unwrap();
    let stairs = world
        .random_location(|_, cell| cell.terrain == Terrain::StairsDown)
        .expect("glade has stairs");

    if let Some(other) = world.map().creature(stairs).filter(|c| *c != player) {
        world.remove_creature(other);
    }
    for item in world.map().items(stairs).to_vec() {
        world.remove_map_item(item);
    }
    world.move_creature(player, stairs).unwrap();
    world.creature_mut(player).unwrap().initiative = ACTION_COST;
    world.set_player_action(Box::new(Interact::new(player, stairs)));

    assert_eq!(world.update().unwrap(), UpdateStatus::ZoneChange);
    assert_eq!(world.zone().map(|z| z.id), Some("glade"));

    world.update().unwrap();
    assert_eq!(world.zone().map(|z| z.id), Some("depths"));
    assert_eq!(world.player(), Some(player));
    assert_positions_agree(&world);
}

#[test]
fn autopilot_plays_without_breaking_invariants() {
    let mut world = World::create("glade", 23, WorldSettings::default()).unwrap();
    let player = world.player().unwrap();
    world.set_behavior(player, catalog::autopilot()).unwrap();

    for _ in 0..400 {
        match world.update().unwrap() {
            UpdateStatus::AwaitingPrompt => world.resolve_prompt(),
            UpdateStatus::Idle => break,
            _ => {}
        }
        assert_positions_agree(&world);
        if world.player().is_none() {
            break;
        }
    }
    assert!(world.turn() > 0);
}

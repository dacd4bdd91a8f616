use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use crate::behavior::{Behavior, Decision, PathFollower};
use crate::entity::CreatureId;
use crate::map::pathfinding::creature_path;
use crate::sensor;
use crate::util::geometry::{chebyshev, manhattan, neighbors4, row_major, Coord};
use crate::world::World;

/// Half-width of the square searched for somewhere to flee to.
const FLIGHT_WINDOW: i32 = 6;

/// Bolt away from whatever startled the creature, once per scare.
#[derive(Default)]
pub struct Startle {
    seen: u64,
    follower: PathFollower,
}

impl Startle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for Startle {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let state = sensor::startled(world, actor)?;
        let position = world.creature(actor)?.position;
        if state.sequence != self.seen {
            self.seen = state.sequence;
            if let Some(threat) = state.threat {
                self.follower.set(flight_path(world, actor, position, threat));
            }
        }
        Ok(self.follower.step(actor, position, world.map()))
    }
}

/// Route to a random cell among the farthest third (from the threat) of the
/// cells reachable inside the flight window.
fn flight_path(world: &World, actor: CreatureId, from: Coord, threat: Coord) -> Vec<Coord> {
    let map = world.map();
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    let mut reachable = Vec::new();
    while let Some(c) = queue.pop_front() {
        for n in neighbors4(c) {
            if chebyshev(n, from) <= FLIGHT_WINDOW && map.is_traversable(n) && seen.insert(n) {
                reachable.push(n);
                queue.push_back(n);
            }
        }
    }

    reachable.sort_by_key(|c| (Reverse(manhattan(*c, threat)), row_major(c)));
    let farthest = &reachable[..reachable.len().div_ceil(3)];
    match world.random().pick(farthest) {
        Some(goal) => creature_path(map, from, *goal, &[actor]),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::resolve_attack;
    use crate::entity::{CreatureType, Faction};
    use crate::sensor::StartleSensor;
    use crate::testing::{room, spawn, HERO};
    use crate::util::table::RollMany;

    static HARE: CreatureType = CreatureType {
        key: "test_hare",
        name: "hare",
        glyph: 'r',
        faction: Faction::Wildlife,
        defense: 9,
        melee: 0,
        health_max: 20,
        speed: 100,
        behavior: None,
        scripts: &[&StartleSensor { sense_radius: None }],
        kit: &[],
        loot: RollMany::empty(),
    };

    #[test]
    fn calm_creature_stays_put() {
        let mut world = room(10, 10);
        let hare = spawn(&mut world, &HARE, 5, 5);
        assert!(Startle::new().decide(hare, &world).unwrap().is_none());
    }

    #[test]
    fn flees_away_from_attacker() {
        let mut world = room(30, 3);
        let hare = spawn(&mut world, &HARE, 1, 1);
        let hero = spawn(&mut world, &HERO, 0, 1);
        resolve_attack(&mut world, hero, hare).unwrap();

        let mut b = Startle::new();
        let mut steps = 0;
        while let Some(action) = b.decide(hare, &world).unwrap() {
            action.execute(&mut world).unwrap();
            steps += 1;
            assert!(steps < 50);
        }
        let p = world.creature(hare).unwrap().position;
        assert!(p.x >= 5, "Hare should run east, ended at {:?}", p);

        // The same scare is not acted on twice.
        assert!(b.decide(hare, &world).unwrap().is_none());
    }
}

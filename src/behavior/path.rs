use crate::behavior::{Behavior, Decision, PathFollower};
use crate::entity::CreatureId;
use crate::map::pathfinding::creature_path;
use crate::sensor;
use crate::util::geometry::{manhattan, Coord};
use crate::world::{World, WorldError};

/// Destination attempts per decision before giving up.
const MAX_DESTINATION_ATTEMPTS: usize = 5;
/// Random cells sampled when looking for somewhere to roam to.
const ROAM_SAMPLES: usize = 10;

/// Picks where to walk. Receives the destination rejected by the previous
/// attempt in the same decision, if any; `None` means nowhere to go.
pub type DestinationFn =
    Box<dyn FnMut(CreatureId, &World, Option<Coord>) -> Result<Option<Coord>, WorldError>>;

/// Walk a cached path; when it runs out or is blocked, choose a new
/// destination and plan a route to it.
pub struct PathFinding {
    destination: DestinationFn,
    follower: PathFollower,
}

impl PathFinding {
    pub fn new(destination: DestinationFn) -> Self {
        Self {
            destination,
            follower: PathFollower::new(),
        }
    }

    pub fn reset(&mut self) {
        self.follower.clear();
    }

    pub fn goal(&self) -> Option<Coord> {
        self.follower.destination()
    }
}

impl Behavior for PathFinding {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let position = world.creature(actor)?.position;
        if let Some(action) = self.follower.step(actor, position, world.map()) {
            return Ok(Some(action));
        }

        let mut rejected = None;
        for _ in 0..MAX_DESTINATION_ATTEMPTS {
            let Some(goal) = (self.destination)(actor, world, rejected)? else {
                break;
            };
            if goal != position {
                self.follower
                    .set(creature_path(world.map(), position, goal, &[actor]));
                if let Some(action) = self.follower.step(actor, position, world.map()) {
                    return Ok(Some(action));
                }
            }
            rejected = Some(goal);
        }
        self.follower.clear();
        Ok(None)
    }
}

/// Wander between random walkable cells within `radius` of home, or of the
/// current position for creatures without a home sensor.
pub fn roam(radius: i32) -> PathFinding {
    PathFinding::new(Box::new(
        move |actor: CreatureId, world: &World, _rejected: Option<Coord>| -> Result<Option<Coord>, WorldError> {
            let center = match sensor::home(world, actor) {
                Ok(home) => home,
                Err(WorldError::MissingSensorData { .. }) => world.creature(actor)?.position,
                Err(e) => return Err(e),
            };
            let random = world.random();
            for _ in 0..ROAM_SAMPLES {
                let c = center + Coord::new(random.range(-radius, radius), random.range(-radius, radius));
                if world.map().is_traversable(c) {
                    return Ok(Some(c));
                }
            }
            Ok(None)
        },
    ))
}

/// Head back home once farther than `max_distance` from it.
pub struct ReturnHome {
    max_distance: i32,
    walk: PathFinding,
}

impl ReturnHome {
    pub fn new(max_distance: i32) -> Self {
        let walk = PathFinding::new(Box::new(
            |actor: CreatureId, world: &World, rejected: Option<Coord>| -> Result<Option<Coord>, WorldError> {
                let home = sensor::home(world, actor)?;
                Ok((rejected != Some(home)).then_some(home))
            },
        ));
        Self { max_distance, walk }
    }
}

impl Behavior for ReturnHome {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let home = sensor::home(world, actor)?;
        let position = world.creature(actor)?.position;
        if manhattan(position, home) <= self.max_distance {
            self.walk.reset();
            return Ok(None);
        }
        self.walk.decide(actor, world)
    }
}

use crate::action::Attack;
use crate::behavior::{chain, Behavior, BehaviorChain, Decision, PathFollower};
use crate::entity::CreatureId;
use crate::map::pathfinding::creature_path;
use crate::util::geometry::{is_adjacent, Coord};
use crate::world::World;

/// Attack `target` whenever it stands in one of the four adjacent cells.
pub struct AttackTarget {
    target: CreatureId,
}

pub fn attack(target: CreatureId) -> AttackTarget {
    AttackTarget { target }
}

impl Behavior for AttackTarget {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let Some(target) = world.find_creature(self.target) else {
            return Ok(None);
        };
        let position = world.creature(actor)?.position;
        if is_adjacent(position, target.position) {
            return Ok(Some(Box::new(Attack::new(actor, self.target))));
        }
        Ok(None)
    }
}

/// Walk toward `target`, re-planning only when it moves.
pub struct Chase {
    target: CreatureId,
    planned_for: Option<Coord>,
    follower: PathFollower,
}

pub fn chase(target: CreatureId) -> Chase {
    Chase {
        target,
        planned_for: None,
        follower: PathFollower::new(),
    }
}

impl Behavior for Chase {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let Some(goal) = world.find_creature(self.target).map(|c| c.position) else {
            self.follower.clear();
            return Ok(None);
        };
        let position = world.creature(actor)?.position;
        if self.planned_for != Some(goal) {
            let path = creature_path(world.map(), position, goal, &[actor, self.target]);
            self.follower.set(path);
            self.planned_for = Some(goal);
        }
        Ok(self.follower.step(actor, position, world.map()))
    }
}

/// Attack when adjacent, otherwise close in.
pub fn chase_and_attack(target: CreatureId) -> BehaviorChain {
    chain(vec![Box::new(attack(target)), Box::new(chase(target))])
}

//! Behaviors: per-creature decision makers.
//!
//! A behavior looks at the world and proposes at most one action. Returning
//! `None` declines, which lets a chain fall through to the next behavior.
//! Behaviors may keep state between decisions (a cached path, a chosen
//! target); each creature owns its own instances.

pub mod chase;
pub mod follow;
pub mod guard;
pub mod path;
pub mod retaliate;
pub mod startle;
pub mod wander;

use crate::action::{Action, Noop};
use crate::entity::CreatureId;
use crate::world::{World, WorldError};

pub use chase::{attack, chase, chase_and_attack, AttackTarget, Chase};
pub use follow::PathFollower;
pub use guard::Guard;
pub use path::{roam, PathFinding, ReturnHome};
pub use retaliate::Retaliate;
pub use startle::Startle;
pub use wander::Wander;

pub type Decision = Result<Option<Box<dyn Action>>, WorldError>;

pub trait Behavior {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision;
}

impl<F> Behavior for F
where
    F: FnMut(CreatureId, &World) -> Decision,
{
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        self(actor, world)
    }
}

/// Ask each behavior in order; the first proposal wins.
pub struct BehaviorChain {
    steps: Vec<Box<dyn Behavior>>,
}

pub fn chain(steps: Vec<Box<dyn Behavior>>) -> BehaviorChain {
    BehaviorChain { steps }
}

impl Behavior for BehaviorChain {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        for step in &mut self.steps {
            if let Some(action) = step.decide(actor, world)? {
                return Ok(Some(action));
            }
        }
        Ok(None)
    }
}

/// Rest `idle_chance` percent of the time without consulting `inner`.
pub struct MaybeIdle {
    inner: Box<dyn Behavior>,
    idle_chance: i32,
}

pub fn maybe_idle(inner: impl Behavior + 'static, idle_chance: i32) -> MaybeIdle {
    MaybeIdle {
        inner: Box::new(inner),
        idle_chance,
    }
}

impl Behavior for MaybeIdle {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        if world.random().chance(self.idle_chance) {
            return Ok(Some(Box::new(Noop)));
        }
        self.inner.decide(actor, world)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{room, spawn, BRUTE};

    fn decline(_: CreatureId, _: &World) -> Decision {
        Ok(None)
    }

    fn rest(_: CreatureId, _: &World) -> Decision {
        Ok(Some(Box::new(Noop)))
    }

    #[test]
    fn chain_takes_first_proposal() {
        let mut world = room(3, 3);
        let id = spawn(&mut world, &BRUTE, 1, 1);
        let mut first = chain(vec![Box::new(decline), Box::new(rest)]);
        assert!(first.decide(id, &world).unwrap().is_some());

        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let counting = move |_: CreatureId, _: &World| -> Decision {
            seen.set(seen.get() + 1);
            Ok(Some(Box::new(Noop)))
        };
        let mut second = chain(vec![Box::new(rest), Box::new(counting)]);
        assert!(second.decide(id, &world).unwrap().is_some());
        assert_eq!(calls.get(), 0, "Later steps are not consulted once one proposes");

        let mut none = chain(vec![Box::new(decline), Box::new(decline)]);
        assert!(none.decide(id, &world).unwrap().is_none());
        world.remove_creature(id);
    }

    #[test]
    fn chain_propagates_errors() {
        let world = room(3, 3);
        let failing = |actor: CreatureId, world: &World| -> Decision {
            world.creature(actor)?;
            Ok(None)
        };
        let mut b = chain(vec![Box::new(failing), Box::new(rest)]);
        assert!(b.decide(CreatureId(99), &world).is_err());
    }

    #[test]
    fn maybe_idle_extremes() {
        let mut world = room(3, 3);
        let id = spawn(&mut world, &BRUTE, 1, 1);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let counting = move |_: CreatureId, _: &World| -> Decision {
            seen.set(seen.get() + 1);
            Ok(None)
        };
        let mut always = maybe_idle(counting.clone(), 100);
        for _ in 0..20 {
            assert!(always.decide(id, &world).unwrap().is_some(), "Idling still spends the turn");
        }
        assert_eq!(calls.get(), 0);

        let mut never = maybe_idle(counting, 0);
        for _ in 0..20 {
            assert!(never.decide(id, &world).unwrap().is_none());
        }
        assert_eq!(calls.get(), 20);
    }
}

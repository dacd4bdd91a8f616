use crate::action::Move;
use crate::behavior::{Behavior, Decision};
use crate::entity::CreatureId;
use crate::util::geometry::{Coord, CARDINALS};
use crate::world::World;

/// Step to a random open neighbor.
pub struct Wander;

impl Behavior for Wander {
    fn decide(&mut self, actor: CreatureId, world: &World) -> Decision {
        let position = world.creature(actor)?.position;
        let open: Vec<Coord> = CARDINALS
            .iter()
            .copied()
            .filter(|d| world.map().is_traversable(position + *d))
            .collect();
        Ok(world
            .random()
            .pick(&open)
            .map(|d| Box::new(Move::new(actor, *d)) as _))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{room, spawn, BRUTE};

    #[test]
    fn boxed_in_creature_declines() {
        let mut world = room(1, 1);
        let id = spawn(&mut world, &BRUTE, 0, 0);
        assert!(Wander.decide(id, &world).unwrap().is_none());
    }

    #[test]
    fn wanders_within_open_cells() {
        let mut world = room(3, 3);
        let id = spawn(&mut world, &BRUTE, 1, 1);
        for _ in 0..30 {
            let action = Wander.decide(id, &world).unwrap().expect("open room");
            assert!(action.execute(&mut world).unwrap().is_ok());
            let p = world.creature(id).unwrap().position;
            assert!(p.x >= 0 && p.x < 3 && p.y >= 0 && p.y < 3);
        }
    }
}

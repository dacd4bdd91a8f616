use std::collections::VecDeque;

use crate::action::{Action, Move};
use crate::entity::CreatureId;
use crate::map::Map;
use crate::util::geometry::{is_adjacent, Coord};

/// A cached path and the logic to walk it one step per decision.
#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    path: VecDeque<Coord>,
}

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: Vec<Coord>) {
        self.path = path.into();
    }

    pub fn clear(&mut self) {
        self.path.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn destination(&self) -> Option<Coord> {
        self.path.back().copied()
    }

    /// Step toward the next cell of the path. `None` when the path is used
    /// up, the creature has left it, or the next cell is currently blocked;
    /// a blocked path is kept so the walk can resume once it clears.
    pub fn step(&mut self, actor: CreatureId, position: Coord, map: &Map) -> Option<Box<dyn Action>> {
        while self.path.front() == Some(&position) {
            self.path.pop_front();
        }
        let next = *self.path.front()?;
        if !is_adjacent(position, next) {
            self.path.clear();
            return None;
        }
        if !map.is_traversable(next) {
            return None;
        }
        self.path.pop_front();
        Some(Box::new(Move::new(actor, next - position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Terrain;
    use crate::util::geometry::Rect;

    fn corridor() -> Map {
        let mut map = Map::new();
        map.fill(Rect::new(0, 0, 5, 1), Terrain::Floor);
        map
    }

    fn path(len: i32) -> Vec<Coord> {
        (0..len).map(|x| Coord::new(x, 0)).collect()
    }

    #[test]
    fn walks_the_path_one_step_at_a_time() {
        let map = corridor();
        let mut follower = PathFollower::new();
        follower.set(path(3));
        assert_eq!(follower.destination(), Some(Coord::new(2, 0)));
        assert!(follower.step(CreatureId(1), Coord::new(0, 0), &map).is_some());
        assert!(follower.step(CreatureId(1), Coord::new(1, 0), &map).is_some());
        assert!(follower.step(CreatureId(1), Coord::new(2, 0), &map).is_none());
        assert!(follower.is_empty());
    }

    #[test]
    fn blocked_step_keeps_the_path() {
        let mut map = corridor();
        map.set_creature(Coord::new(1, 0), Some(CreatureId(2)));
        let mut follower = PathFollower::new();
        follower.set(path(4));
        assert!(follower.step(CreatureId(1), Coord::new(0, 0), &map).is_none());
        assert_eq!(follower.destination(), Some(Coord::new(3, 0)));
        map.set_creature(Coord::new(1, 0), None);
        assert!(follower.step(CreatureId(1), Coord::new(0, 0), &map).is_some());
    }

    #[test]
    fn leaving_the_path_discards_it() {
        let map = corridor();
        let mut follower = PathFollower::new();
        follower.set(path(5));
        assert!(follower.step(CreatureId(1), Coord::new(3, 3), &map).is_none());
        assert!(follower.is_empty());
    }
}

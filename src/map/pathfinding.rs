use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::entity::CreatureId;
use crate::map::Map;
use crate::util::geometry::{manhattan, neighbors4, Coord};

/// Default expansion budget for AI path requests on an unbounded map.
pub const PATH_SEARCH_LIMIT: usize = 2_000;

/// Step costs used by [`creature_adjusted_cost`]. Must satisfy
/// `occupied >= adjacent >= base >= 1` to keep Manhattan distance admissible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostWeights {
    pub base: i32,
    pub adjacent: i32,
    pub occupied: i32,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            base: 1,
            adjacent: 3,
            occupied: 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    f: i32,
    seq: u64,
    pos: Coord,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Node {}

impl Ord for Node {
    // Min-heap on f; among equal f the most recently pushed node wins.
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search from `start` to `goal`.
///
/// Returns the path with both ends included, `[start]` when already at the
/// goal, and an empty vector when the goal is unreachable or more than
/// `fail_after` nodes were expanded. `distance(from, to)` is the cost of one
/// step and must never be lower than `heuristic` predicts.
pub fn a_star<N, I, H, D>(
    start: Coord,
    goal: Coord,
    mut neighbors: N,
    heuristic: H,
    mut distance: D,
    fail_after: Option<usize>,
) -> Vec<Coord>
where
    N: FnMut(Coord) -> I,
    I: IntoIterator<Item = Coord>,
    H: Fn(Coord, Coord) -> i32,
    D: FnMut(Coord, Coord) -> i32,
{
    if start == goal {
        return vec![start];
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut g_score: HashMap<Coord, i32> = HashMap::new();
    let mut closed: HashSet<Coord> = HashSet::new();
    let mut seq = 0_u64;
    let mut expansions = 0_usize;

    g_score.insert(start, 0);
    open.push(Node {
        f: heuristic(start, goal),
        seq,
        pos: start,
    });

    while let Some(Node { pos: current, .. }) = open.pop() {
        if current == goal {
            let mut path = vec![goal];
            let mut node = goal;
            while let Some(&prev) = came_from.get(&node) {
                path.push(prev);
                node = prev;
            }
            path.reverse();
            return path;
        }

        // Stale heap entries for already-expanded cells.
        if !closed.insert(current) {
            continue;
        }

        expansions += 1;
        if fail_after.is_some_and(|limit| expansions > limit) {
            return Vec::new();
        }

        let current_g = g_score.get(&current).copied().unwrap_or(i32::MAX);
        for next in neighbors(current) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = current_g.saturating_add(distance(current, next));
            if tentative < g_score.get(&next).copied().unwrap_or(i32::MAX) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                seq += 1;
                open.push(Node {
                    f: tentative.saturating_add(heuristic(next, goal)),
                    seq,
                    pos: next,
                });
            }
        }
    }

    Vec::new()
}

pub fn uniform_cost(_from: Coord, _to: Coord) -> i32 {
    1
}

/// Cardinal neighbors whose terrain is walkable, occupied or not.
pub fn terrain_neighbors(map: &Map) -> impl Fn(Coord) -> Vec<Coord> + '_ {
    move |c| {
        neighbors4(c)
            .into_iter()
            .filter(|n| map.terrain(*n).traversable())
            .collect()
    }
}

/// Cardinal neighbors that are free to step into. The goal is always allowed
/// so that a path can end on an occupied cell.
pub fn open_neighbors(map: &Map, goal: Coord) -> impl Fn(Coord) -> Vec<Coord> + '_ {
    move |c| {
        neighbors4(c)
            .into_iter()
            .filter(|n| *n == goal || map.is_traversable(*n))
            .collect()
    }
}

/// Step cost that makes routes bend around other creatures: stepping onto an
/// occupied cell costs `occupied`, next to one costs `adjacent`, else `base`.
/// Creatures in `ignore` (usually the walker itself) do not count.
pub fn creature_adjusted_cost<'a>(
    map: &'a Map,
    ignore: &'a [CreatureId],
    weights: CostWeights,
) -> impl Fn(Coord, Coord) -> i32 + 'a {
    move |_from, to| {
        let occupied = |c: Coord| map.creature(c).is_some_and(|id| !ignore.contains(&id));
        if occupied(to) {
            weights.occupied
        } else if neighbors4(to).into_iter().any(occupied) {
            weights.adjacent
        } else {
            weights.base
        }
    }
}

/// Shortest walkable path that treats creatures as hard obstacles (except on
/// the goal). Empty when the goal terrain itself cannot be walked on.
pub fn find_path(map: &Map, start: Coord, goal: Coord, fail_after: Option<usize>) -> Vec<Coord> {
    if start == goal {
        return vec![start];
    }
    if !map.terrain(goal).traversable() {
        return Vec::new();
    }
    a_star(
        start,
        goal,
        open_neighbors(map, goal),
        manhattan,
        uniform_cost,
        fail_after,
    )
}

/// Path for a walking creature: creatures are soft obstacles priced by
/// [`creature_adjusted_cost`], so crowds are avoided but never make a target
/// unreachable.
pub fn creature_path(map: &Map, start: Coord, goal: Coord, ignore: &[CreatureId]) -> Vec<Coord> {
    if start == goal {
        return vec![start];
    }
    if !map.terrain(goal).traversable() {
        return Vec::new();
    }
    a_star(
        start,
        goal,
        terrain_neighbors(map),
        manhattan,
        creature_adjusted_cost(map, ignore, CostWeights::default()),
        Some(PATH_SEARCH_LIMIT),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::map::Terrain;
    use crate::util::geometry::Rect;
    use crate::util::random::Random;

    fn open_room(width: i32, height: i32) -> Map {
        let mut map = Map::new();
        map.fill(Rect::new(0, 0, width, height), Terrain::Floor);
        map
    }

    fn bfs_length(map: &Map, start: Coord, goal: Coord) -> Option<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 1_usize)]);
        while let Some((c, len)) = queue.pop_front() {
            if c == goal {
                return Some(len);
            }
            for n in neighbors4(c) {
                if map.is_traversable(n) && seen.insert(n) {
                    queue.push_back((n, len + 1));
                }
            }
        }
        None
    }

    #[test]
    fn path_to_self_has_length_one() {
        let map = Map::new();
        let origin = Coord::new(0, 0);
        assert_eq!(find_path(&map, origin, origin, None), vec![origin]);
    }

    #[test]
    fn straight_corridor_returns_every_cell_in_order() {
        let map = open_room(10, 1);
        let path = find_path(&map, Coord::new(0, 0), Coord::new(9, 0), None);
        assert_eq!(path.len(), 10);
        for (i, c) in path.iter().enumerate() {
            assert_eq!(*c, Coord::new(i as i32, 0));
        }
    }

    #[test]
    fn unreachable_goal_returns_empty() {
        let mut map = open_room(7, 7);
        // Wall in the goal at (5, 5)
        for c in Rect::new(4, 4, 3, 3).border() {
            map.set_terrain(c, Terrain::Wall);
        }
        assert!(find_path(&map, Coord::new(0, 0), Coord::new(5, 5), None).is_empty());
    }

    #[test]
    fn solid_goal_returns_empty() {
        let mut map = open_room(5, 5);
        map.set_terrain(Coord::new(4, 4), Terrain::Wall);
        assert!(find_path(&map, Coord::new(0, 0), Coord::new(4, 4), None).is_empty());
        assert!(find_path(&map, Coord::new(0, 0), Coord::new(40, 40), None).is_empty());
    }

    #[test]
    fn matches_bfs_length_on_random_grids() {
        let random = Random::new(1234);
        for trial in 0..40 {
            let mut map = open_room(9, 9);
            for c in Rect::new(0, 0, 9, 9).cells() {
                if random.chance(30) {
                    map.set_terrain(c, Terrain::Wall);
                }
            }
            let start = Coord::new(0, 0);
            let goal = Coord::new(8, 8);
            map.set_terrain(start, Terrain::Floor);
            map.set_terrain(goal, Terrain::Floor);

            let path = find_path(&map, start, goal, None);
            match bfs_length(&map, start, goal) {
                Some(len) => {
                    assert_eq!(path.len(), len, "Trial {} path not optimal", trial);
                    for pair in path.windows(2) {
                        assert_eq!(manhattan(pair[0], pair[1]), 1);
                        assert!(map.is_traversable(pair[1]));
                    }
                }
                None => assert!(path.is_empty(), "Trial {} found a path BFS could not", trial),
            }
        }
    }

    #[test]
    fn expansion_budget_aborts_search() {
        let map = open_room(60, 60);
        let path = find_path(&map, Coord::new(0, 0), Coord::new(59, 59), Some(10));
        assert!(path.is_empty());
        let path = find_path(&map, Coord::new(0, 0), Coord::new(59, 59), None);
        assert_eq!(path.len(), 119);
    }

    #[test]
    fn same_input_same_path() {
        let map = open_room(12, 12);
        let a = find_path(&map, Coord::new(0, 0), Coord::new(11, 7), None);
        let b = find_path(&map, Coord::new(0, 0), Coord::new(11, 7), None);
        assert_eq!(a, b);
    }

    #[test]
    fn adjusted_cost_routes_around_creatures() {
        // Two lanes (y = 0 and y = 2) separated by a wall row; a creature sits in the top lane.
        let mut map = open_room(7, 3);
        for x in 1..6 {
            map.set_terrain(Coord::new(x, 1), Terrain::Wall);
        }
        map.set_creature(Coord::new(3, 0), Some(CreatureId(9)));
        let walker = CreatureId(1);
        let path = creature_path(&map, Coord::new(0, 0), Coord::new(6, 0), &[walker]);
        assert!(!path.is_empty());
        assert!(
            path.iter().all(|c| c.y != 0 || c.x == 0 || c.x == 6),
            "Path should use the empty lane: {:?}",
            path
        );

        let ignoring = creature_path(&map, Coord::new(0, 0), Coord::new(6, 0), &[walker, CreatureId(9)]);
        assert_eq!(ignoring.len(), 7, "Ignored creature should not add cost");
    }

    #[test]
    fn adjusted_cost_weights() {
        let mut map = open_room(5, 5);
        map.set_creature(Coord::new(2, 2), Some(CreatureId(2)));
        let cost = creature_adjusted_cost(&map, &[], CostWeights::default());
        let w = CostWeights::default();
        assert_eq!(cost(Coord::new(2, 1), Coord::new(2, 2)), w.occupied);
        assert_eq!(cost(Coord::new(2, 0), Coord::new(2, 1)), w.adjacent);
        assert_eq!(cost(Coord::new(0, 1), Coord::new(0, 0)), w.base);
    }
}

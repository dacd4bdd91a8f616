use std::collections::HashSet;

use crate::map::Map;
use crate::util::geometry::{line, Coord, Rect};

/// Every cell a straight ray passes through, from `from` to `to`.
pub fn cast_ray(from: Coord, to: Coord) -> Vec<Coord> {
    line(from, to)
}

/// Cells visible from `origin` within a square of half-width `radius`.
///
/// One ray is cast to each cell on the edge of the square. A ray marks cells
/// visible until it reaches a sight-blocking cell, which is itself visible.
/// A repair pass then reveals walls the edge rays missed at shallow angles.
pub fn visible_cells(map: &Map, origin: Coord, radius: i32) -> HashSet<Coord> {
    let mut visible = HashSet::from([origin]);
    let radius = radius.max(0);
    let bounds = Rect::new(origin.x - radius, origin.y - radius, 2 * radius + 1, 2 * radius + 1);

    for edge in edge_cells(bounds) {
        for c in cast_ray(origin, edge).into_iter().skip(1) {
            visible.insert(c);
            if map.blocks_sight(c) {
                break;
            }
        }
    }

    repair_walls(map, origin, bounds, &mut visible);
    visible
}

/// Reveal hidden sight-blocking cells that have a visible, open neighbor on
/// the observer's side: the horizontal, vertical or diagonal neighbor one step
/// back toward `origin`, chosen by the quadrant the cell lies in. Only cells lit
/// by rays count as evidence; revealed walls do not cascade.
pub(crate) fn repair_walls(map: &Map, origin: Coord, bounds: Rect, visible: &mut HashSet<Coord>) {
    let lit = visible.clone();
    for c in bounds.cells() {
        if lit.contains(&c) || !map.blocks_sight(c) {
            continue;
        }
        let toward = (c - origin).signum();
        let candidates = [
            c - Coord::new(toward.x, 0),
            c - Coord::new(0, toward.y),
            c - toward,
        ];
        let revealed = candidates
            .iter()
            .any(|n| *n != c && lit.contains(n) && !map.blocks_sight(*n));
        if revealed {
            visible.insert(c);
        }
    }
}

fn edge_cells(bounds: Rect) -> Vec<Coord> {
    if bounds.width <= 1 || bounds.height <= 1 {
        return bounds.cells().collect();
    }
    let inner = Rect::new(bounds.x + 1, bounds.y + 1, bounds.width - 2, bounds.height - 2);
    bounds.cells().filter(|c| !inner.contains(*c)).collect()
}

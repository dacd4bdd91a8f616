use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Integer grid coordinate. The map is unbounded in every direction.
pub type Coord = IVec2;

/// The four cardinal steps, in the order pathfinding expands them.
pub const CARDINALS: [Coord; 4] = [IVec2::NEG_Y, IVec2::X, IVec2::Y, IVec2::NEG_X];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }

    pub fn delta(self) -> Coord {
        match self {
            Direction::North => IVec2::NEG_Y,
            Direction::East => IVec2::X,
            Direction::South => IVec2::Y,
            Direction::West => IVec2::NEG_X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The dominant cardinal direction of a delta. Horizontal wins ties.
    /// Returns `None` for a zero delta.
    pub fn from_delta(delta: Coord) -> Option<Direction> {
        if delta == IVec2::ZERO {
            return None;
        }
        if delta.x.abs() >= delta.y.abs() {
            Some(if delta.x > 0 {
                Direction::East
            } else {
                Direction::West
            })
        } else {
            Some(if delta.y > 0 {
                Direction::South
            } else {
                Direction::North
            })
        }
    }

    /// Parse console spellings: `n`, `north`, `up`, ...
    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" | "up" | "k" => Some(Direction::North),
            "e" | "east" | "right" | "l" => Some(Direction::East),
            "s" | "south" | "down" | "j" => Some(Direction::South),
            "w" | "west" | "left" | "h" => Some(Direction::West),
            _ => None,
        }
    }
}

/// Axis-aligned rectangle. `x`/`y` is the top-left cell; `width`/`height` count cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both corners (inclusive).
    pub fn spanning(a: Coord, b: Coord) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn center(&self) -> Coord {
        IVec2::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.x && c.x < self.right() && c.y >= self.y && c.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow by `n` cells on every side.
    pub fn expand(&self, n: i32) -> Rect {
        Rect::new(
            self.x - n,
            self.y - n,
            self.width + 2 * n,
            self.height + 2 * n,
        )
    }

    /// Grow to include `c`.
    pub fn include(&self, c: Coord) -> Rect {
        let min = IVec2::new(self.x.min(c.x), self.y.min(c.y));
        let max = IVec2::new((self.right() - 1).max(c.x), (self.bottom() - 1).max(c.y));
        Rect::spanning(min, max)
    }

    /// Every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + use<> {
        let Rect {
            x,
            y,
            width,
            height,
        } = *self;
        (y..y + height).flat_map(move |cy| (x..x + width).map(move |cx| IVec2::new(cx, cy)))
    }

    /// The one-cell ring directly outside this rectangle.
    pub fn border(&self) -> Vec<Coord> {
        let outer = self.expand(1);
        outer.cells().filter(|c| !self.contains(*c)).collect()
    }
}

pub fn manhattan(a: Coord, b: Coord) -> i32 {
    (a - b).abs().element_sum()
}

pub fn chebyshev(a: Coord, b: Coord) -> i32 {
    (a - b).abs().max_element()
}

/// Same row or column, one step apart. Diagonals do not count.
pub fn is_adjacent(a: Coord, b: Coord) -> bool {
    manhattan(a, b) == 1
}

pub fn neighbors4(c: Coord) -> [Coord; 4] {
    CARDINALS.map(|d| c + d)
}

/// Row-major ordering key, used wherever hash-map iteration must be made deterministic.
pub fn row_major(c: &Coord) -> (i32, i32) {
    (c.y, c.x)
}

/// Bresenham line from `from` to `to`, both ends included, in travel order.
pub fn line(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = from;
    let mut points = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        points.push(p);
        if p == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
    points
}

/// Midpoint circle outline, deduplicated and sorted row-major.
pub fn circle(center: Coord, radius: i32) -> Vec<Coord> {
    if radius <= 0 {
        return vec![center];
    }
    let mut points = Vec::new();
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            points.push(center + IVec2::new(px, py));
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    points.sort_by_key(row_major);
    points.dedup();
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_horizontal_includes_both_ends() {
        let pts = line(IVec2::new(0, 0), IVec2::new(4, 0));
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], IVec2::new(0, 0));
        assert_eq!(pts[4], IVec2::new(4, 0));
    }

    #[test]
    fn line_steps_are_single_cells() {
        let targets = [
            IVec2::new(7, 3),
            IVec2::new(-5, 9),
            IVec2::new(-8, -2),
            IVec2::new(3, -11),
        ];
        for to in targets {
            let pts = line(IVec2::ZERO, to);
            assert_eq!(*pts.last().unwrap(), to);
            for pair in pts.windows(2) {
                assert_eq!(
                    chebyshev(pair[0], pair[1]),
                    1,
                    "Line to {:?} jumped from {:?} to {:?}",
                    to,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn line_to_self_is_single_point() {
        assert_eq!(line(IVec2::new(3, 3), IVec2::new(3, 3)), vec![IVec2::new(3, 3)]);
    }

    #[test]
    fn circle_points_lie_near_radius() {
        let pts = circle(IVec2::ZERO, 5);
        assert!(!pts.is_empty());
        for p in &pts {
            let d = ((p.x * p.x + p.y * p.y) as f64).sqrt();
            assert!((d - 5.0).abs() < 1.0, "Point {:?} at distance {}", p, d);
        }
        assert!(pts.contains(&IVec2::new(5, 0)));
        assert!(pts.contains(&IVec2::new(0, -5)));
    }

    #[test]
    fn adjacency_is_four_directional() {
        let o = IVec2::new(2, 2);
        assert!(is_adjacent(o, IVec2::new(3, 2)));
        assert!(is_adjacent(o, IVec2::new(2, 1)));
        assert!(!is_adjacent(o, IVec2::new(3, 3)));
        assert!(!is_adjacent(o, o));
    }

    #[test]
    fn rect_intersection_and_expand() {
        let a = Rect::new(0, 0, 3, 3);
        let b = Rect::new(3, 0, 2, 2);
        assert!(!a.intersects(&b), "Touching edges do not intersect");
        assert!(a.expand(1).intersects(&b));
        assert_eq!(a.border().len(), 16);
        assert_eq!(a.cells().count(), 9);
    }

    #[test]
    fn direction_from_delta_prefers_horizontal() {
        assert_eq!(Direction::from_delta(IVec2::new(2, 2)), Some(Direction::East));
        assert_eq!(Direction::from_delta(IVec2::new(0, -1)), Some(Direction::North));
        assert_eq!(Direction::from_delta(IVec2::ZERO), None);
        assert_eq!(Direction::parse("Up"), Some(Direction::North));
        assert_eq!(Direction::parse("sideways"), None);
    }
}

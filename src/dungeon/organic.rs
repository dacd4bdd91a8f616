use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::generation::GladeParams;
use crate::dungeon::{Dungeon, Region, RegionKind};
use crate::map::pathfinding::a_star;
use crate::map::Terrain;
use crate::util::geometry::{manhattan, neighbors4, Coord, Rect};
use crate::util::random::Random;

/// Margin kept between clearing seeds and the edge of the forest.
const SEED_MARGIN: i32 = 3;
/// Highest step cost through untouched brush when routing trails.
const BRUSH_COST_MAX: i32 = 6;

/// Generate a forest: a rectangle of brush with clearings grown out of it,
/// joined in order by winding trails, and trees scattered through what is left.
///
/// Clearings grow from a seed cell by repeatedly converting a random cell of
/// the growth front and adding its unconverted neighbors to the front, which
/// gives ragged shapes instead of rectangles.
pub fn generate_glade(params: &GladeParams) -> Dungeon {
    let seed = Random::resolve_seed(params.seed);
    let random = Random::new(seed);
    let area = Rect::new(0, 0, params.width, params.height);
    let interior = area.expand(-1);
    let seed_area = area.expand(-SEED_MARGIN);

    let mut open: HashSet<Coord> = HashSet::new();
    let mut clearings = Vec::new();
    let mut centers = Vec::new();
    for _ in 0..params.clearing_count {
        let center = Coord::new(
            seed_area.x + random.below(seed_area.width),
            seed_area.y + random.below(seed_area.height),
        );
        let cells = grow_clearing(center, params.clearing_size as usize, interior, &open, &random);
        open.extend(cells.iter().copied());
        if let Some(region) = Region::organic(RegionKind::Clearing, cells) {
            clearings.push(region);
            centers.push(center);
        }
    }

    let mut trails = Vec::new();
    for pair in centers.windows(2) {
        let path = trail(pair[0], pair[1], interior, &open, &random);
        let cells: Vec<Coord> = path.into_iter().filter(|c| !open.contains(c)).collect();
        open.extend(cells.iter().copied());
        trails.extend(Region::organic(RegionKind::Trail, cells));
    }

    let mut features: Vec<(Coord, Terrain)> = area
        .cells()
        .filter(|c| !interior.contains(*c))
        .map(|c| (c, Terrain::Tree))
        .collect();
    for c in interior.cells() {
        if !open.contains(&c) && random.chance(params.tree_chance) {
            features.push((c, Terrain::Tree));
        }
    }

    let start = centers.first().copied().unwrap_or_else(|| interior.center());
    let stairs = centers.last().copied().filter(|c| *c != start);

    debug!(
        seed,
        clearings = clearings.len(),
        trails = trails.len(),
        open = open.len(),
        "Generated glade"
    );

    let mut regions = clearings;
    regions.extend(trails);
    Dungeon {
        seed,
        regions,
        start,
        stairs,
        base: Some((area, Terrain::Brush)),
        features,
        ..Default::default()
    }
}

/// Grow one clearing of up to `size` cells from `center`, staying inside
/// `bounds`. Cells already converted by earlier clearings are not counted
/// again but do not stop the growth.
fn grow_clearing(
    center: Coord,
    size: usize,
    bounds: Rect,
    taken: &HashSet<Coord>,
    random: &Random,
) -> Vec<Coord> {
    let mut converted: HashSet<Coord> = HashSet::new();
    let mut cells = Vec::new();
    let mut front = vec![center];

    while cells.len() < size && !front.is_empty() {
        let c = front.swap_remove(random.index(front.len()));
        if !converted.insert(c) {
            continue;
        }
        if !taken.contains(&c) {
            cells.push(c);
        }
        for n in neighbors4(c) {
            if bounds.contains(n) && !converted.contains(&n) {
                front.push(n);
            }
        }
    }
    cells
}

/// Route a trail with A*, where each brush cell costs a random amount fixed
/// for the duration of this call and open ground costs the minimum. The
/// result meanders but still prefers existing clearings.
fn trail(from: Coord, to: Coord, bounds: Rect, open: &HashSet<Coord>, random: &Random) -> Vec<Coord> {
    let mut costs: HashMap<Coord, i32> = HashMap::new();
    a_star(
        from,
        to,
        |c| {
            neighbors4(c)
                .into_iter()
                .filter(|n| bounds.contains(*n))
                .collect::<Vec<_>>()
        },
        manhattan,
        |_, next| {
            if open.contains(&next) {
                return 1;
            }
            *costs
                .entry(next)
                .or_insert_with(|| random.range(1, BRUSH_COST_MAX))
        },
        None,
    )
}

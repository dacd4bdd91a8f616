use tracing::debug;

use crate::dungeon::{CreatureSpawn, Dungeon, ItemSpawn, RegionKind};
use crate::entity::{CreatureType, ItemTemplate};
use crate::util::geometry::Coord;
use crate::util::random::Random;
use crate::util::table::{RollMany, RollOne};

/// Distinct cells tried for one creature before the spawn is dropped.
const PLACEMENT_ATTEMPTS: usize = 10;

/// Spawn tables applied to every room or clearing.
#[derive(Debug, Clone, Copy)]
pub struct Population {
    /// One roll per slot; `None` entries leave the slot empty.
    pub creatures: &'static RollOne<Option<&'static CreatureType>>,
    pub creatures_per_region: u32,
    pub items: &'static RollMany<&'static ItemTemplate>,
}

/// Fill rooms and clearings from `population`. The region holding the start
/// gets items but no creatures. Creatures never share a cell with each other,
/// the start or the stairs; a creature that finds no free cell after a few
/// tries is skipped.
pub fn populate(dungeon: &mut Dungeon, population: &Population, random: &Random) {
    let regions: Vec<(bool, Vec<Coord>)> = dungeon
        .regions
        .iter()
        .filter(|r| matches!(r.kind, RegionKind::Room | RegionKind::Clearing))
        .map(|r| (r.cells.contains(&dungeon.start), r.cells.clone()))
        .collect();

    for (holds_start, cells) in &regions {
        if !holds_start {
            for _ in 0..population.creatures_per_region {
                if let Some(&Some(kind)) = population.creatures.roll(random) {
                    place_creature(dungeon, kind, cells, random);
                }
            }
        }
        for template in population.items.roll(random) {
            if let Some(position) = random.pick(cells) {
                dungeon.items.push(ItemSpawn {
                    template: *template,
                    position: *position,
                });
            }
        }
    }
}

/// Place `kind` on a free cell of `cells`. Returns false when every attempt
/// hit an occupied cell.
pub fn place_creature(
    dungeon: &mut Dungeon,
    kind: &'static CreatureType,
    cells: &[Coord],
    random: &Random,
) -> bool {
    let mut candidates = cells.to_vec();
    random.shuffle(&mut candidates);
    for &position in candidates.iter().take(PLACEMENT_ATTEMPTS) {
        if is_free(dungeon, position) {
            dungeon.creatures.push(CreatureSpawn { kind, position });
            return true;
        }
    }
    debug!(kind = kind.key, "No free cell for creature, spawn dropped");
    false
}

fn is_free(dungeon: &Dungeon, c: Coord) -> bool {
    c != dungeon.start
        && dungeon.stairs != Some(c)
        && !dungeon.features.iter().any(|(f, _)| *f == c)
        && !dungeon.creatures.iter().any(|s| s.position == c)
}

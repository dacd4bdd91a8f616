//! Procedural level generation.
//!
//! Generators produce a [`Dungeon`]: a plain description of regions, spawn
//! points and terrain features. Nothing touches a [`Map`] until
//! [`Dungeon::stamp`] runs, so a layout can be generated, summarized and
//! compared without building a world.

pub mod organic;
pub mod populate;
pub mod rooms;

use std::collections::HashMap;

use serde::Serialize;

use crate::entity::{CreatureType, ItemTemplate};
use crate::map::{Map, Terrain};
use crate::util::geometry::{Coord, Rect};
use crate::util::random::Random;

pub use organic::generate_glade;
pub use populate::{place_creature, populate, Population};
pub use rooms::generate_dungeon;

/// Salt for the door rolls made while stamping, so they do not consume the
/// generator's own random stream.
const DOOR_SALT: u64 = 0x0D00_125A_17ED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Room,
    Tunnel,
    Clearing,
    Trail,
}

/// A connected area of the layout. Rooms and tunnels are full rectangles;
/// clearings and trails list their cells and carry their bounding box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    pub bounds: Rect,
    pub cells: Vec<Coord>,
}

impl Region {
    pub fn rectangle(kind: RegionKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            cells: bounds.cells().collect(),
        }
    }

    /// Region over an arbitrary, non-empty set of cells.
    pub fn organic(kind: RegionKind, cells: Vec<Coord>) -> Option<Self> {
        let (first, rest) = cells.split_first()?;
        let bounds = rest
            .iter()
            .fold(Rect::new(first.x, first.y, 1, 1), |r, c| r.include(*c));
        Some(Self { kind, bounds, cells })
    }

    pub fn is_rectangular(&self) -> bool {
        matches!(self.kind, RegionKind::Room | RegionKind::Tunnel)
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureSpawn {
    pub kind: &'static CreatureType,
    pub position: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSpawn {
    pub template: &'static ItemTemplate,
    pub position: Coord,
}

/// A generated layout and everything placed in it.
#[derive(Debug, Clone, Default)]
pub struct Dungeon {
    /// Resolved seed; generating again with it reproduces this layout.
    pub seed: u64,
    pub regions: Vec<Region>,
    pub creatures: Vec<CreatureSpawn>,
    pub items: Vec<ItemSpawn>,
    pub start: Coord,
    pub stairs: Option<Coord>,
    /// Placements rejected during generation.
    pub failures: u32,
    /// Percent chance for a tunnel cell crossing a wall to become a door.
    pub door_chance: i32,
    /// Terrain laid down under everything else.
    pub base: Option<(Rect, Terrain)>,
    /// Single-cell terrain stamped last (trees, water).
    pub features: Vec<(Coord, Terrain)>,
}

impl Dungeon {
    pub fn rooms(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.kind == RegionKind::Room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    /// Bounding box of every region, walls included.
    pub fn extents(&self) -> Option<Rect> {
        let mut bounds = self.regions.iter().map(|r| {
            if r.is_rectangular() {
                r.bounds.expand(1)
            } else {
                r.bounds
            }
        });
        let first = bounds.next()?;
        let regions = bounds.fold(first, |acc, r| {
            acc.include(Coord::new(r.x, r.y))
                .include(Coord::new(r.right() - 1, r.bottom() - 1))
        });
        Some(match self.base {
            Some((rect, _)) => regions
                .include(Coord::new(rect.x, rect.y))
                .include(Coord::new(rect.right() - 1, rect.bottom() - 1)),
            None => regions,
        })
    }

    /// Whether the cell is floor once stamped, ignoring features.
    pub fn is_open(&self, c: Coord) -> bool {
        self.regions.iter().any(|r| r.bounds.contains(c) && r.cells.contains(&c))
    }

    /// Write the layout's terrain onto `map`. Rooms and tunnels get a
    /// one-cell wall ring; where a tunnel passes through a wall it may leave
    /// a door. Stamping is deterministic for a given dungeon.
    pub fn stamp(&self, map: &mut Map) {
        if let Some((rect, terrain)) = self.base {
            map.fill(rect, terrain);
        }

        for region in self.regions.iter().filter(|r| r.is_rectangular()) {
            for c in region.bounds.border() {
                if map.terrain(c) == Terrain::Void {
                    map.set_terrain(c, Terrain::Wall);
                }
            }
        }
        for room in self.rooms() {
            map.fill(room.bounds, Terrain::Floor);
        }

        let doors = Random::new(self.seed ^ DOOR_SALT);
        for tunnel in self.regions.iter().filter(|r| r.kind == RegionKind::Tunnel) {
            for c in &tunnel.cells {
                let terrain = if map.terrain(*c) == Terrain::Wall && doors.chance(self.door_chance) {
                    Terrain::Door
                } else if map.terrain(*c) == Terrain::Door {
                    continue;
                } else {
                    Terrain::Floor
                };
                map.set_terrain(*c, terrain);
            }
        }

        for region in &self.regions {
            let terrain = match region.kind {
                RegionKind::Clearing => Terrain::Grass,
                RegionKind::Trail => Terrain::Trail,
                RegionKind::Room | RegionKind::Tunnel => continue,
            };
            for c in &region.cells {
                if map.terrain(*c) != Terrain::Trail {
                    map.set_terrain(*c, terrain);
                }
            }
        }

        for (c, terrain) in &self.features {
            map.set_terrain(*c, *terrain);
        }
        if let Some(stairs) = self.stairs {
            map.set_terrain(stairs, Terrain::StairsDown);
        }
    }
}

/// Print a summary of a generated layout.
pub fn print_dungeon_summary(dungeon: &Dungeon, show_map: bool) {
    println!("=== Dungeon Summary ===");
    println!("Seed: {}", dungeon.seed);

    let mut kinds: HashMap<RegionKind, (usize, usize)> = HashMap::new();
    for region in &dungeon.regions {
        let entry = kinds.entry(region.kind).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += region.area();
    }
    let mut sorted: Vec<_> = kinds.into_iter().collect();
    sorted.sort_by_key(|(kind, _)| format!("{:?}", kind));
    println!("\nRegions:");
    for (kind, (count, cells)) in &sorted {
        println!("  {:<10} {:>4} ({} cells)", format!("{:?}", kind), count, cells);
    }

    println!("\nRejected placements: {}", dungeon.failures);
    println!("Start: ({}, {})", dungeon.start.x, dungeon.start.y);
    match dungeon.stairs {
        Some(s) => println!("Stairs: ({}, {})", s.x, s.y),
        None => println!("Stairs: none"),
    }
    println!("Creatures: {}", dungeon.creatures.len());
    println!("Items: {}", dungeon.items.len());

    if show_map {
        let mut map = Map::new();
        dungeon.stamp(&mut map);
        if let Some(extents) = map.extents() {
            println!();
            for (row, line) in map.render_rows(extents).into_iter().enumerate() {
                let y = extents.y + row as i32;
                let line: String = line
                    .chars()
                    .enumerate()
                    .map(|(col, glyph)| {
                        let c = Coord::new(extents.x + col as i32, y);
                        if c == dungeon.start {
                            '@'
                        } else if let Some(spawn) = dungeon.creatures.iter().find(|s| s.position == c) {
                            spawn.kind.glyph
                        } else if let Some(spawn) = dungeon.items.iter().find(|s| s.position == c) {
                            spawn.template.glyph
                        } else {
                            glyph
                        }
                    })
                    .collect();
                println!("{}", line);
            }
        }
    }
}

pub mod pathfinding;
pub mod sight;
pub mod terrain;

use std::collections::HashMap;

use crate::entity::{CreatureId, ItemId};
use crate::util::geometry::{row_major, Coord, Rect};
pub use terrain::{Terrain, TerrainInfo};

/// One grid cell: terrain, at most one creature, and a stack of items.
///
/// The creature reference is only an id. The world owns creature lifetimes and
/// keeps this pointer in agreement with the creature's own position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapCell {
    pub terrain: Terrain,
    pub creature: Option<CreatureId>,
    pub items: Vec<ItemId>,
}

/// Returned for reads of cells that were never written.
static DEFAULT_CELL: MapCell = MapCell {
    terrain: Terrain::Void,
    creature: None,
    items: Vec::new(),
};

impl Default for MapCell {
    fn default() -> Self {
        DEFAULT_CELL.clone()
    }
}

/// Sparse, unbounded grid. Cells materialize on first write; reads never allocate.
#[derive(Debug, Clone, Default)]
pub struct Map {
    cells: HashMap<Coord, MapCell>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, c: Coord) -> &MapCell {
        self.cells.get(&c).unwrap_or(&DEFAULT_CELL)
    }

    fn cell_mut(&mut self, c: Coord) -> &mut MapCell {
        self.cells.entry(c).or_default()
    }

    pub fn terrain(&self, c: Coord) -> Terrain {
        self.cell(c).terrain
    }

    pub fn set_terrain(&mut self, c: Coord, terrain: Terrain) {
        self.cell_mut(c).terrain = terrain;
    }

    pub fn creature(&self, c: Coord) -> Option<CreatureId> {
        self.cell(c).creature
    }

    pub fn set_creature(&mut self, c: Coord, creature: Option<CreatureId>) {
        self.cell_mut(c).creature = creature;
    }

    /// Walkable terrain with nobody standing on it.
    pub fn is_traversable(&self, c: Coord) -> bool {
        let cell = self.cell(c);
        cell.terrain.traversable() && cell.creature.is_none()
    }

    pub fn blocks_sight(&self, c: Coord) -> bool {
        self.terrain(c).blocks_sight()
    }

    pub fn items(&self, c: Coord) -> &[ItemId] {
        &self.cell(c).items
    }

    pub fn add_item(&mut self, c: Coord, item: ItemId) {
        self.cell_mut(c).items.push(item);
    }

    /// Returns false if the item was not on that cell.
    pub fn remove_item(&mut self, c: Coord, item: ItemId) -> bool {
        let Some(cell) = self.cells.get_mut(&c) else {
            return false;
        };
        match cell.items.iter().position(|i| *i == item) {
            Some(index) => {
                cell.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Materialized cells matching `predicate`, optionally limited to `extents`,
    /// in row-major order.
    pub fn cells<F>(&self, predicate: F, extents: Option<Rect>) -> Vec<(Coord, &MapCell)>
    where
        F: Fn(Coord, &MapCell) -> bool,
    {
        let mut found: Vec<(Coord, &MapCell)> = self
            .cells
            .iter()
            .filter(|(c, _)| extents.is_none_or(|r| r.contains(**c)))
            .filter(|(c, cell)| predicate(**c, cell))
            .map(|(c, cell)| (*c, cell))
            .collect();
        found.sort_by_key(|(c, _)| row_major(c));
        found
    }

    /// Bounding box of every materialized cell.
    pub fn extents(&self) -> Option<Rect> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        Some(keys.fold(Rect::new(first.x, first.y, 1, 1), |r, c| r.include(*c)))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn fill(&mut self, rect: Rect, terrain: Terrain) {
        for c in rect.cells() {
            self.set_terrain(c, terrain);
        }
    }

    /// Plain-text dump of terrain glyphs, one string per row.
    pub fn render_rows(&self, rect: Rect) -> Vec<String> {
        (rect.y..rect.bottom())
            .map(|y| {
                (rect.x..rect.right())
                    .map(|x| self.terrain(Coord::new(x, y)).glyph())
                    .collect()
            })
            .collect()
    }
}

use serde::{Deserialize, Serialize};

/// Terrain kinds. Each variant indexes one immutable [`TerrainInfo`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Reported for every cell that was never written.
    Void,
    Floor,
    Wall,
    Door,
    OpenDoor,
    StairsDown,
    /// Dense undergrowth: walkable, but nothing can be seen through it.
    Brush,
    Grass,
    Trail,
    Tree,
    Water,
}

/// Static properties of a terrain kind.
#[derive(Debug, PartialEq, Eq)]
pub struct TerrainInfo {
    pub id: u8,
    pub name: &'static str,
    pub traversable: bool,
    pub blocks_sight: bool,
    pub description: Option<&'static str>,
    pub glyph: char,
    pub color: [u8; 3],
}

static CATALOG: [TerrainInfo; 11] = [
    TerrainInfo {
        id: 0,
        name: "void",
        traversable: false,
        blocks_sight: true,
        description: None,
        glyph: ' ',
        color: [0, 0, 0],
    },
    TerrainInfo {
        id: 1,
        name: "floor",
        traversable: true,
        blocks_sight: false,
        description: None,
        glyph: '.',
        color: [120, 110, 100],
    },
    TerrainInfo {
        id: 2,
        name: "wall",
        traversable: false,
        blocks_sight: true,
        description: Some("Rough-hewn stone."),
        glyph: '#',
        color: [90, 80, 70],
    },
    TerrainInfo {
        id: 3,
        name: "door",
        traversable: true,
        blocks_sight: true,
        description: Some("A heavy wooden door."),
        glyph: '+',
        color: [150, 100, 40],
    },
    TerrainInfo {
        id: 4,
        name: "open door",
        traversable: true,
        blocks_sight: false,
        description: Some("The door stands open."),
        glyph: '\'',
        color: [150, 100, 40],
    },
    TerrainInfo {
        id: 5,
        name: "stairs down",
        traversable: true,
        blocks_sight: false,
        description: Some("Steps lead down into darkness."),
        glyph: '>',
        color: [220, 220, 220],
    },
    TerrainInfo {
        id: 6,
        name: "brush",
        traversable: true,
        blocks_sight: true,
        description: Some("Thick, tangled undergrowth."),
        glyph: '"',
        color: [40, 90, 30],
    },
    TerrainInfo {
        id: 7,
        name: "grass",
        traversable: true,
        blocks_sight: false,
        description: None,
        glyph: ',',
        color: [90, 160, 60],
    },
    TerrainInfo {
        id: 8,
        name: "trail",
        traversable: true,
        blocks_sight: false,
        description: Some("A narrow game trail."),
        glyph: ':',
        color: [140, 120, 80],
    },
    TerrainInfo {
        id: 9,
        name: "tree",
        traversable: false,
        blocks_sight: true,
        description: Some("An old, gnarled tree."),
        glyph: 'T',
        color: [30, 120, 40],
    },
    TerrainInfo {
        id: 10,
        name: "water",
        traversable: false,
        blocks_sight: false,
        description: Some("Still, dark water."),
        glyph: '~',
        color: [40, 70, 160],
    },
];

impl Terrain {
    pub fn all() -> &'static [Terrain] {
        &[
            Terrain::Void,
            Terrain::Floor,
            Terrain::Wall,
            Terrain::Door,
            Terrain::OpenDoor,
            Terrain::StairsDown,
            Terrain::Brush,
            Terrain::Grass,
            Terrain::Trail,
            Terrain::Tree,
            Terrain::Water,
        ]
    }

    pub fn info(self) -> &'static TerrainInfo {
        &CATALOG[self as usize]
    }

    pub fn traversable(self) -> bool {
        self.info().traversable
    }

    pub fn blocks_sight(self) -> bool {
        self.info().blocks_sight
    }

    pub fn glyph(self) -> char {
        self.info().glyph
    }

    pub fn by_id(id: u8) -> Option<Terrain> {
        Terrain::all().get(id as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_match_variants() {
        for t in Terrain::all() {
            assert_eq!(t.info().id as usize, *t as usize, "{:?} has mismatched id", t);
            assert_eq!(Terrain::by_id(t.info().id), Some(*t));
        }
    }

    #[test]
    fn void_is_solid_and_opaque() {
        assert!(!Terrain::Void.traversable());
        assert!(Terrain::Void.blocks_sight());
    }

    #[test]
    fn doors_walkable_but_closed_doors_block_sight() {
        assert!(Terrain::Door.traversable());
        assert!(Terrain::Door.blocks_sight());
        assert!(!Terrain::OpenDoor.blocks_sight());
    }
}

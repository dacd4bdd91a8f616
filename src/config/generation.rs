use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for the rectangular room-and-tunnel generator.
/// Stored with each generated dungeon for reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    /// 0 picks a random seed; the resolved seed is recorded on the dungeon.
    pub seed: u64,
    pub maximum_room_count: u32,
    pub room_area_min: i32,
    pub room_area_max: i32,
    /// 0.0 yields square rooms, 1.0 allows up to 3:1 aspect ratios.
    pub room_irregularity: f64,
    pub hallway_length_min: i32,
    pub hallway_length_max: i32,
    /// Empty cells kept between a new room's walls and anything already placed.
    pub minimum_clearance: i32,
    /// Rejected placements allowed before generation stops early.
    pub maximum_failures: u32,
    /// Percent chance that a tunnel crossing a wall gets a door there.
    pub door_chance: i32,
    pub monsters_per_room: u32,
    pub place_stairs: bool,
}

impl DungeonParams {
    pub const DEFAULT: DungeonParams = DungeonParams {
        seed: 0,
        maximum_room_count: 12,
        room_area_min: 16,
        room_area_max: 64,
        room_irregularity: 0.5,
        hallway_length_min: 3,
        hallway_length_max: 8,
        minimum_clearance: 1,
        maximum_failures: 200,
        door_chance: 40,
        monsters_per_room: 2,
        place_stairs: true,
    };

    /// Load generation parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let params: Self = toml::from_str(content)
            .map_err(|e| format!("Invalid TOML in {}: {}", source_path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    /// Validate parameter ranges, reporting every problem at once.
    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.maximum_room_count == 0 {
            errors.push("maximum_room_count must be >= 1, got 0. Example: maximum_room_count = 12".to_string());
        }
        if self.room_area_min < 4 {
            errors.push(format!(
                "room_area_min must be >= 4, got {}. Example: room_area_min = 16",
                self.room_area_min
            ));
        }
        if self.room_area_max < self.room_area_min {
            errors.push(format!(
                "room_area_max must be >= room_area_min ({}), got {}. Example: room_area_max = 64",
                self.room_area_min, self.room_area_max
            ));
        }
        if !(0.0..=1.0).contains(&self.room_irregularity) {
            errors.push(format!(
                "room_irregularity must be 0.0-1.0, got {}. Example: room_irregularity = 0.5",
                self.room_irregularity
            ));
        }
        if self.hallway_length_min < 2 {
            errors.push(format!(
                "hallway_length_min must be >= 2, got {}. Example: hallway_length_min = 3",
                self.hallway_length_min
            ));
        }
        if self.hallway_length_max < self.hallway_length_min {
            errors.push(format!(
                "hallway_length_max must be >= hallway_length_min ({}), got {}. Example: hallway_length_max = 8",
                self.hallway_length_min, self.hallway_length_max
            ));
        }
        if self.minimum_clearance < 0 {
            errors.push(format!(
                "minimum_clearance must be >= 0, got {}. Example: minimum_clearance = 1",
                self.minimum_clearance
            ));
        }
        if !(0..=100).contains(&self.door_chance) {
            errors.push(format!(
                "door_chance must be 0-100, got {}. Example: door_chance = 40",
                self.door_chance
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for the organic forest generator: brush with grown clearings
/// joined by trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GladeParams {
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub clearing_count: u32,
    /// Cells converted per clearing.
    pub clearing_size: u32,
    /// Percent chance for each remaining brush cell to hold a tree.
    pub tree_chance: i32,
}

impl GladeParams {
    pub const DEFAULT: GladeParams = GladeParams {
        seed: 0,
        width: 48,
        height: 32,
        clearing_count: 5,
        clearing_size: 40,
        tree_chance: 12,
    };

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let params: Self = toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.width < 10 || self.height < 10 {
            errors.push(format!(
                "width and height must be >= 10, got {}x{}. Example: width = 48",
                self.width, self.height
            ));
        }
        if self.clearing_count == 0 {
            errors.push("clearing_count must be >= 1, got 0. Example: clearing_count = 5".to_string());
        }
        if self.clearing_size < 4 {
            errors.push(format!(
                "clearing_size must be >= 4, got {}. Example: clearing_size = 40",
                self.clearing_size
            ));
        }
        if !(0..=100).contains(&self.tree_chance) {
            errors.push(format!(
                "tree_chance must be 0-100, got {}. Example: tree_chance = 12",
                self.tree_chance
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

impl Default for GladeParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

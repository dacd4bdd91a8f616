use crate::entity::{CreatureId, ItemId};
use crate::util::geometry::Coord;

/// Invariant violations raised by the world and its script API.
///
/// These indicate a misconfigured creature, a bad script or a generator bug.
/// Expected gameplay failures (a blocked step, a full equipment slot) are
/// reported through return values instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    UnknownCreature(CreatureId),
    UnknownItem(ItemId),
    UnknownZone(String),
    UnknownCreatureType(String),
    UnknownItemTemplate(String),
    CellBlocked(Coord),
    InvalidLocation(Coord),
    MissingSensorData {
        creature: CreatureId,
        sensor: &'static str,
    },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::UnknownCreature(id) => write!(f, "No creature with id {}", id.0),
            WorldError::UnknownItem(id) => write!(f, "No item with id {}", id.0),
            WorldError::UnknownZone(id) => write!(f, "Unknown zone '{}'", id),
            WorldError::UnknownCreatureType(key) => write!(f, "Unknown creature type '{}'", key),
            WorldError::UnknownItemTemplate(key) => write!(f, "Unknown item template '{}'", key),
            WorldError::CellBlocked(c) => {
                write!(f, "Cell ({}, {}) is solid or already occupied", c.x, c.y)
            }
            WorldError::InvalidLocation(c) => {
                write!(f, "Cell ({}, {}) cannot hold items", c.x, c.y)
            }
            WorldError::MissingSensorData { creature, sensor } => write!(
                f,
                "Creature {} has no '{}' data; its type is missing the {} script",
                creature.0, sensor, sensor
            ),
        }
    }
}

impl std::error::Error for WorldError {}

use serde::Serialize;

use crate::combat::AttackReport;
use crate::entity::CreatureId;
use crate::util::geometry::Coord;

/// Notifications for whatever front end drives the world. Drained by the
/// caller after each update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldEvent {
    /// A full pass over the creature list finished.
    Turn { turn: u64 },
    /// At least one action ran during the last update.
    Update,
    Message { text: String },
    Speech {
        speaker: Option<CreatureId>,
        lines: Vec<String>,
    },
    CreatureAdded {
        creature: CreatureId,
        kind: &'static str,
        position: Coord,
    },
    CreatureMoved {
        creature: CreatureId,
        from: Coord,
        to: Coord,
    },
    CreatureRemoved { creature: CreatureId },
    Attack {
        attacker: CreatureId,
        defender: CreatureId,
        report: AttackReport,
    },
    Death {
        creature: CreatureId,
        position: Coord,
    },
    ZoneEntered { zone: &'static str, seed: u64 },
}

impl WorldEvent {
    /// Text a console front end should print, if any.
    pub fn display_text(&self) -> Option<String> {
        match self {
            WorldEvent::Message { text } => Some(text.clone()),
            WorldEvent::Speech { lines, .. } => Some(lines.join("\n")),
            _ => None,
        }
    }
}

use std::collections::HashMap;

use serde::Serialize;

use crate::entity::Faction;
use crate::world::World;

/// Aggregate counts after an update, for logs and degenerate state detection.
#[derive(Debug, Clone, Serialize)]
pub struct PassStatistics {
    pub turn: u64,
    pub creatures: usize,
    pub factions: HashMap<Faction, u32>,
    pub items_on_ground: usize,
    pub items_carried: usize,
    /// Mean stored health over maximum health, 0 with no creatures.
    pub average_health: f32,
    pub update_duration_ms: f32,
}

impl PassStatistics {
    /// True when nothing is left that could fight the player.
    pub fn is_cleared(&self) -> bool {
        self.factions.get(&Faction::Monster).copied().unwrap_or(0) == 0
    }
}

pub fn compute_statistics(world: &World, update_duration_ms: f32) -> PassStatistics {
    let mut factions: HashMap<Faction, u32> = HashMap::new();
    let mut health_fraction = 0.0_f64;
    let mut creatures = 0;

    for creature in world.creatures() {
        *factions.entry(creature.faction()).or_insert(0) += 1;
        health_fraction += creature.health as f64 / creature.health_max(world.items()) as f64;
        creatures += 1;
    }

    let items_on_ground = world
        .items()
        .iter()
        .filter(|i| i.ground_position().is_some())
        .count();

    PassStatistics {
        turn: world.turn(),
        creatures,
        factions,
        items_on_ground,
        items_carried: world.items().len() - items_on_ground,
        average_health: if creatures == 0 {
            0.0
        } else {
            (health_fraction / creatures as f64) as f32
        },
        update_duration_ms,
    }
}

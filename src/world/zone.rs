//! The zone catalog: which generator builds each level, what lives there,
//! and which world scripts run while the player is in it.

use tracing::info;

use crate::config::generation::{DungeonParams, GladeParams};
use crate::dungeon::{
    generate_dungeon, generate_glade, place_creature, populate, Dungeon, Population, RegionKind,
};
use crate::entity::catalog;
use crate::entity::{CreatureId, CreatureType};
use crate::util::geometry::{chebyshev, Coord};
use crate::util::random::Random;
use crate::world::{World, WorldError, WorldScript};

/// Salt separating population rolls from layout rolls.
const POPULATE_SALT: u64 = 0x5EED_F00D;
/// Passes between reinforcement checks in the depths.
const REINFORCE_INTERVAL: u64 = 50;
/// The depths stop spawning reinforcements above this many creatures.
const REINFORCE_CAP: usize = 12;

pub enum ZoneLayout {
    Dungeon {
        params: DungeonParams,
        population: Population,
    },
    Glade {
        params: GladeParams,
        population: Population,
        /// Placed in the clearing farthest along the trail.
        resident: Option<&'static CreatureType>,
    },
}

pub struct Zone {
    pub id: &'static str,
    pub name: &'static str,
    pub layout: ZoneLayout,
    /// Zone loaded by taking this zone's stairs.
    pub stairs_to: Option<&'static str>,
    pub scripts: fn() -> Vec<Box<dyn WorldScript>>,
}

impl Zone {
    /// Build and populate this zone's layout. The same seed always gives the
    /// same layout and spawns.
    pub fn generate(&self, seed: u64) -> Dungeon {
        match &self.layout {
            ZoneLayout::Dungeon { params, population } => {
                let mut dungeon = generate_dungeon(&DungeonParams {
                    seed,
                    ..params.clone()
                });
                let random = Random::new(dungeon.seed ^ POPULATE_SALT);
                populate(&mut dungeon, population, &random);
                dungeon
            }
            ZoneLayout::Glade {
                params,
                population,
                resident,
            } => {
                let mut dungeon = generate_glade(&GladeParams {
                    seed,
                    ..params.clone()
                });
                let random = Random::new(dungeon.seed ^ POPULATE_SALT);
                if let Some(kind) = *resident {
                    let home = dungeon
                        .regions
                        .iter()
                        .filter(|r| r.kind == RegionKind::Clearing)
                        .last()
                        .map(|r| r.cells.clone())
                        .unwrap_or_default();
                    place_creature(&mut dungeon, kind, &home, &random);
                }
                populate(&mut dungeon, population, &random);
                dungeon
            }
        }
    }
}

impl std::fmt::Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zone")
            .field("id", &self.id)
            .field("stairs_to", &self.stairs_to)
            .finish()
    }
}

pub static GLADE: Zone = Zone {
    id: "glade",
    name: "The Glade",
    layout: ZoneLayout::Glade {
        params: GladeParams::DEFAULT,
        population: Population {
            creatures: &catalog::GLADE_CREATURES,
            creatures_per_region: 1,
            items: &catalog::GLADE_FORAGE,
        },
        resident: Some(&catalog::HERMIT),
    },
    stairs_to: Some("depths"),
    scripts: glade_scripts,
};

pub static DEPTHS: Zone = Zone {
    id: "depths",
    name: "The Depths",
    layout: ZoneLayout::Dungeon {
        params: DungeonParams::DEFAULT,
        population: Population {
            creatures: &catalog::DUNGEON_MONSTERS,
            creatures_per_region: DungeonParams::DEFAULT.monsters_per_room,
            items: &catalog::DUNGEON_TREASURE,
        },
    },
    stairs_to: None,
    scripts: depths_scripts,
};

static ZONES: [&Zone; 2] = [&GLADE, &DEPTHS];

pub fn find(id: &str) -> Option<&'static Zone> {
    ZONES.iter().copied().find(|z| z.id == id)
}

pub fn ids() -> Vec<&'static str> {
    ZONES.iter().map(|z| z.id).collect()
}

fn glade_scripts() -> Vec<Box<dyn WorldScript>> {
    vec![Box::new(GladeScript)]
}

fn depths_scripts() -> Vec<Box<dyn WorldScript>> {
    vec![Box::new(DepthsScript::default())]
}

/// Greets the player on arrival.
pub struct GladeScript;

impl WorldScript for GladeScript {
    fn name(&self) -> &'static str {
        "glade"
    }

    fn on_initialize(&mut self, world: &mut World) -> Result<(), WorldError> {
        world.show_message("Sunlight filters through the leaves. Somewhere, a stream.");
        Ok(())
    }
}

/// Announces kills and sends a rat out of the walls now and then.
#[derive(Default)]
pub struct DepthsScript {
    kills: u32,
}

impl WorldScript for DepthsScript {
    fn name(&self) -> &'static str {
        "depths"
    }

    fn on_initialize(&mut self, world: &mut World) -> Result<(), WorldError> {
        world.show_message("The air is cold and smells of old stone.");
        Ok(())
    }

    fn on_turn(&mut self, turn: u64, world: &mut World) -> Result<(), WorldError> {
        if turn % REINFORCE_INTERVAL != 0 || world.creature_count() >= REINFORCE_CAP {
            return Ok(());
        }
        let player = world.player().and_then(|p| world.find_creature(p)).map(|c| c.position);
        let spot = world.random_location(|c, cell| {
            cell.terrain.traversable()
                && cell.creature.is_none()
                && player.is_none_or(|p| chebyshev(c, p) > 8)
        });
        if let Some(spot) = spot {
            world.add_creature(&catalog::RAT, spot)?;
            info!(turn, x = spot.x, y = spot.y, "Reinforcement spawned");
        }
        Ok(())
    }

    fn on_creature_death(
        &mut self,
        creature: CreatureId,
        _position: Coord,
        world: &mut World,
    ) -> Result<(), WorldError> {
        if world.is_player(creature) {
            world.show_message("You die...");
            return Ok(());
        }
        self.kills += 1;
        if self.kills % 5 == 0 {
            world.show_message(format!("{} creatures have fallen in the depths.", self.kills));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;

    #[test]
    fn find_known_and_unknown_zones() {
        assert_eq!(find("glade").map(|z| z.id), Some("glade"));
        assert_eq!(find("depths").map(|z| z.id), Some("depths"));
        assert!(find("moon").is_none());
        assert_eq!(ids(), vec!["glade", "depths"]);
    }

    #[test]
    fn stairs_lead_to_known_zones() {
        for zone in ZONES {
            if let Some(next) = zone.stairs_to {
                assert!(find(next).is_some(), "{} leads to unknown zone {}", zone.id, next);
            }
        }
    }

    #[test]
    fn generation_is_reproducible() {
        for zone in ZONES {
            let a = zone.generate(99);
            let b = zone.generate(99);
            assert_eq!(a.regions, b.regions);
            assert_eq!(a.creatures, b.creatures);
            assert_eq!(a.items, b.items);
        }
    }

    #[test]
    fn spawns_land_on_walkable_free_cells() {
        for zone in ZONES {
            for seed in 1..6 {
                let dungeon = zone.generate(seed);
                let mut map = Map::new();
                dungeon.stamp(&mut map);
                assert!(map.terrain(dungeon.start).traversable());
                for spawn in &dungeon.creatures {
                    assert!(
                        map.terrain(spawn.position).traversable(),
                        "{} seed {}: {} on {:?}",
                        zone.id,
                        seed,
                        spawn.kind.key,
                        map.terrain(spawn.position)
                    );
                    assert_ne!(spawn.position, dungeon.start);
                }
                for spawn in &dungeon.items {
                    assert!(map.terrain(spawn.position).traversable());
                }
            }
        }
    }

    #[test]
    fn glade_has_its_hermit() {
        let dungeon = GLADE.generate(12);
        assert!(dungeon.creatures.iter().any(|s| s.kind.key == "hermit"));
    }
}

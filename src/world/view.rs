//! Read-only snapshot of the world for front ends.

use serde::Serialize;

use crate::entity::{CreatureId, Faction};
use crate::sensor::{self, Facing, Visible};
use crate::util::geometry::{Coord, Direction, Rect};
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureView {
    pub id: CreatureId,
    pub name: &'static str,
    pub glyph: char,
    pub faction: Faction,
    pub position: Coord,
    pub health: i32,
    pub health_max: i32,
    /// Only known for creatures carrying a facing sensor.
    pub facing: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub name: &'static str,
    /// Slot name when worn.
    pub equipped: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldView {
    pub zone: Option<&'static str>,
    pub seed: u64,
    pub turn: u64,
    pub player: Option<CreatureId>,
    pub creatures: Vec<CreatureView>,
    pub inventory: Vec<ItemView>,
    pub items_on_ground: usize,
    /// Size of the player's field of view, when it has one.
    pub visible_cells: Option<usize>,
    pub prompt: Option<Vec<String>>,
}

impl WorldView {
    pub fn capture(world: &World) -> Self {
        let creatures = world
            .creatures()
            .map(|c| CreatureView {
                id: c.id,
                name: c.name(),
                glyph: c.kind.glyph,
                faction: c.faction(),
                position: c.position,
                health: c.health,
                health_max: c.health_max(world.items()),
                facing: c.script_data.get::<Facing>().map(|f| f.0),
            })
            .collect();

        let mut inventory = Vec::new();
        let mut visible_cells = None;
        if let Some(player) = world.player().and_then(|p| world.find_creature(p)) {
            for (slot, id) in &player.equipment {
                if let Some(item) = world.items().get(*id) {
                    inventory.push(ItemView {
                        name: item.name(),
                        equipped: Some(slot.name()),
                    });
                }
            }
            for id in &player.inventory {
                if let Some(item) = world.items().get(*id) {
                    inventory.push(ItemView {
                        name: item.name(),
                        equipped: None,
                    });
                }
            }
            visible_cells = player.script_data.get::<Visible>().map(|v| v.0.len());
        }

        Self {
            zone: world.zone().map(|z| z.id),
            seed: world.seed,
            turn: world.turn(),
            player: world.player(),
            creatures,
            inventory,
            items_on_ground: world.items().iter().filter(|i| i.ground_position().is_some()).count(),
            visible_cells,
            prompt: world.prompt().map(|p| p.to_vec()),
        }
    }
}

/// Text rendering of `rect`: terrain glyphs, with ground items and then
/// creatures drawn on top.
pub fn render(world: &World, rect: Rect) -> Vec<String> {
    let map = world.map();
    (rect.y..rect.bottom())
        .map(|y| {
            (rect.x..rect.right())
                .map(|x| {
                    let c = Coord::new(x, y);
                    if let Some(creature) = map.creature(c).and_then(|id| world.find_creature(id)) {
                        creature.kind.glyph
                    } else if let Some(item) = map.items(c).last().and_then(|id| world.items().get(*id)) {
                        item.template.glyph
                    } else {
                        map.terrain(c).glyph()
                    }
                })
                .collect()
        })
        .collect()
}

/// Cells the player can currently see, or nothing without a visibility sensor.
pub fn player_visible(world: &World) -> Vec<Coord> {
    let Some(player) = world.player() else {
        return Vec::new();
    };
    let mut cells: Vec<Coord> = match sensor::visible(world, player) {
        Ok(cells) => cells.iter().copied().collect(),
        Err(_) => Vec::new(),
    };
    cells.sort_by_key(crate::util::geometry::row_major);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::catalog;
    use crate::testing::{room, spawn, BRUTE, HERO};

    #[test]
    fn capture_lists_creatures_in_schedule_order() {
        let mut world = room(6, 4);
        let hero = world.add_player(&HERO, Coord::new(1, 1)).unwrap();
        let brute = spawn(&mut world, &BRUTE, 4, 2);
        let view = WorldView::capture(&world);

        assert_eq!(view.player, Some(hero));
        let ids: Vec<CreatureId> = view.creatures.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![hero, brute]);
        assert_eq!(view.creatures[1].glyph, 'B');
        assert_eq!(view.creatures[1].health, 10);
        assert!(view.creatures[0].facing.is_none());
        assert!(view.visible_cells.is_none());
    }

    #[test]
    fn capture_reports_player_gear_and_sight() {
        let mut world = room(8, 8);
        world.add_player(&catalog::PLAYER, Coord::new(3, 3)).unwrap();
        world.add_map_item(Coord::new(5, 5), &catalog::BONE).unwrap();
        let view = WorldView::capture(&world);

        let dagger = view.inventory.iter().find(|i| i.name == "dagger").expect("kit dagger");
        assert_eq!(dagger.equipped, Some("main hand"));
        assert!(view.inventory.iter().any(|i| i.name == "healing potion" && i.equipped.is_none()));
        assert_eq!(view.items_on_ground, 1);
        assert!(view.visible_cells.unwrap_or(0) > 0);
        assert!(view.creatures[0].facing.is_some());
        assert_eq!(player_visible(&world).len(), view.visible_cells.unwrap_or(0));
    }

    #[test]
    fn serializes_to_json() {
        let mut world = room(3, 3);
        world.add_player(&HERO, Coord::new(1, 1)).unwrap();
        let json = serde_json::to_value(WorldView::capture(&world)).unwrap();
        assert_eq!(json["turn"], 0);
        assert_eq!(json["creatures"][0]["name"], "hero");
        assert_eq!(json["creatures"][0]["position"], serde_json::json!([1, 1]));
    }

    #[test]
    fn render_draws_creatures_over_items_over_terrain() {
        let mut world = room(3, 1);
        world.add_player(&HERO, Coord::new(0, 0)).unwrap();
        world.add_map_item(Coord::new(1, 0), &catalog::GOLD).unwrap();
        let rows = render(&world, Rect::new(0, 0, 4, 1));
        let gold = catalog::GOLD.glyph;
        assert_eq!(rows, vec![format!("@{}. ", gold)]);
    }
}

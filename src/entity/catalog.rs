//! Static creature types, item templates and spawn tables.

use crate::action::{Action, Interact, UseItem};
use crate::behavior::{
    chain, maybe_idle, roam, Behavior, Decision, Guard, PathFinding, Retaliate, ReturnHome, Startle,
    Wander,
};
use crate::entity::{
    Attribute, CreatureId, CreatureType, Faction, ItemId, ItemTemplate, Modifier, Slot, UseEffect,
};
use crate::map::Terrain;
use crate::sensor::{
    AgeSensor, FacingSensor, HomeSensor, NearbyCreaturesSensor, RetaliationSensor, StartleSensor,
    VisibilitySensor,
};
use crate::util::geometry::Coord;
use crate::util::table::{RollMany, RollOne};
use crate::world::{CreatureScript, World, WorldError};

// Items

pub static DAGGER: ItemTemplate = ItemTemplate {
    key: "dagger",
    name: "dagger",
    glyph: '|',
    description: "A short, chipped blade.",
    slots: &[Slot::MainHand, Slot::OffHand],
    modifiers: &[Modifier::new(Attribute::Melee, 1)],
    use_effect: None,
};

pub static SWORD: ItemTemplate = ItemTemplate {
    key: "sword",
    name: "sword",
    glyph: '/',
    description: "A well-balanced longsword.",
    slots: &[Slot::MainHand],
    modifiers: &[Modifier::new(Attribute::Melee, 2)],
    use_effect: None,
};

pub static SHIELD: ItemTemplate = ItemTemplate {
    key: "shield",
    name: "shield",
    glyph: ')',
    description: "A round wooden shield.",
    slots: &[Slot::OffHand],
    modifiers: &[Modifier::new(Attribute::Defense, 1)],
    use_effect: None,
};

pub static LEATHER_ARMOR: ItemTemplate = ItemTemplate {
    key: "leather_armor",
    name: "leather armor",
    glyph: '[',
    description: "Stiff boiled leather.",
    slots: &[Slot::Body],
    modifiers: &[Modifier::new(Attribute::Defense, 1)],
    use_effect: None,
};

pub static CHAIN_MAIL: ItemTemplate = ItemTemplate {
    key: "chain_mail",
    name: "chain mail",
    glyph: '[',
    description: "Heavy interlocking rings.",
    slots: &[Slot::Body],
    modifiers: &[
        Modifier::new(Attribute::Defense, 2),
        Modifier::new(Attribute::Speed, -10),
    ],
    use_effect: None,
};

pub static HELMET: ItemTemplate = ItemTemplate {
    key: "helmet",
    name: "helmet",
    glyph: '^',
    description: "A dented iron cap.",
    slots: &[Slot::Head],
    modifiers: &[Modifier::new(Attribute::Defense, 1)],
    use_effect: None,
};

pub static RING_OF_VIGOR: ItemTemplate = ItemTemplate {
    key: "ring_of_vigor",
    name: "ring of vigor",
    glyph: '=',
    description: "It hums faintly against the skin.",
    slots: &[Slot::Finger],
    modifiers: &[Modifier::new(Attribute::HealthMax, 5)],
    use_effect: None,
};

pub static HEALING_POTION: ItemTemplate = ItemTemplate {
    key: "healing_potion",
    name: "healing potion",
    glyph: '!',
    description: "A red, faintly warm draught.",
    slots: &[],
    modifiers: &[],
    use_effect: Some(UseEffect::Heal(5)),
};

pub static MUSHROOM: ItemTemplate = ItemTemplate {
    key: "mushroom",
    name: "mushroom",
    glyph: '%',
    description: "Pale and earthy. Probably edible.",
    slots: &[],
    modifiers: &[],
    use_effect: Some(UseEffect::Heal(1)),
};

pub static GOLD: ItemTemplate = ItemTemplate {
    key: "gold",
    name: "gold coins",
    glyph: '$',
    description: "A handful of tarnished coins.",
    slots: &[],
    modifiers: &[],
    use_effect: None,
};

pub static BONE: ItemTemplate = ItemTemplate {
    key: "bone",
    name: "bone",
    glyph: '-',
    description: "Gnawed clean.",
    slots: &[],
    modifiers: &[],
    use_effect: None,
};

pub static ITEM_TEMPLATES: [&ItemTemplate; 11] = [
    &DAGGER,
    &SWORD,
    &SHIELD,
    &LEATHER_ARMOR,
    &CHAIN_MAIL,
    &HELMET,
    &RING_OF_VIGOR,
    &HEALING_POTION,
    &MUSHROOM,
    &GOLD,
    &BONE,
];

// Creatures

pub static PLAYER: CreatureType = CreatureType {
    key: "player",
    name: "adventurer",
    glyph: '@',
    faction: Faction::Player,
    defense: 1,
    melee: 2,
    health_max: 20,
    speed: 100,
    behavior: None,
    scripts: &[
        &FacingSensor,
        &AgeSensor,
        &VisibilitySensor { radius: 8 },
        &NearbyCreaturesSensor { radius: 8 },
    ],
    kit: &[&DAGGER, &HEALING_POTION],
    loot: RollMany::empty(),
};

pub static RAT: CreatureType = CreatureType {
    key: "rat",
    name: "rat",
    glyph: 'r',
    faction: Faction::Monster,
    defense: 0,
    melee: 1,
    health_max: 3,
    speed: 120,
    behavior: Some(rat),
    scripts: &[
        &HomeSensor,
        &VisibilitySensor { radius: 6 },
        &NearbyCreaturesSensor { radius: 6 },
    ],
    kit: &[],
    loot: RollMany::new(&[(20, &BONE)]),
};

pub static GOBLIN: CreatureType = CreatureType {
    key: "goblin",
    name: "goblin",
    glyph: 'g',
    faction: Faction::Monster,
    defense: 1,
    melee: 2,
    health_max: 8,
    speed: 100,
    behavior: Some(goblin),
    scripts: &[
        &HomeSensor,
        &FacingSensor,
        &VisibilitySensor { radius: 8 },
        &NearbyCreaturesSensor { radius: 8 },
        &RetaliationSensor,
    ],
    kit: &[&DAGGER],
    loot: RollMany::new(&[(30, &GOLD), (15, &HEALING_POTION)]),
};

pub static SKELETON: CreatureType = CreatureType {
    key: "skeleton",
    name: "skeleton",
    glyph: 's',
    faction: Faction::Monster,
    defense: 2,
    melee: 2,
    health_max: 6,
    speed: 80,
    behavior: Some(skeleton),
    scripts: &[
        &HomeSensor,
        &VisibilitySensor { radius: 6 },
        &NearbyCreaturesSensor { radius: 6 },
    ],
    kit: &[&SHIELD],
    loot: RollMany::new(&[(60, &BONE), (10, &HELMET)]),
};

pub static DEER: CreatureType = CreatureType {
    key: "deer",
    name: "deer",
    glyph: 'd',
    faction: Faction::Wildlife,
    defense: 0,
    melee: 0,
    health_max: 5,
    speed: 120,
    behavior: Some(deer),
    scripts: &[
        &HomeSensor,
        &VisibilitySensor { radius: 8 },
        &NearbyCreaturesSensor { radius: 8 },
        &StartleSensor { sense_radius: Some(4) },
    ],
    kit: &[],
    loot: RollMany::empty(),
};

pub static BOAR: CreatureType = CreatureType {
    key: "boar",
    name: "boar",
    glyph: 'b',
    faction: Faction::Wildlife,
    defense: 1,
    melee: 2,
    health_max: 7,
    speed: 90,
    behavior: Some(boar),
    scripts: &[&HomeSensor, &RetaliationSensor],
    kit: &[],
    loot: RollMany::new(&[(50, &BONE)]),
};

pub static HERMIT: CreatureType = CreatureType {
    key: "hermit",
    name: "hermit",
    glyph: 'h',
    faction: Faction::Neutral,
    defense: 0,
    melee: 0,
    health_max: 10,
    speed: 50,
    behavior: Some(hermit),
    scripts: &[&HomeSensor, &HermitScript],
    kit: &[],
    loot: RollMany::empty(),
};

pub static CREATURE_TYPES: [&CreatureType; 7] =
    [&PLAYER, &RAT, &GOBLIN, &SKELETON, &DEER, &BOAR, &HERMIT];

// Spawn tables

pub static DUNGEON_MONSTERS: RollOne<Option<&'static CreatureType>> = RollOne::new(&[
    (4, None),
    (4, Some(&RAT)),
    (3, Some(&GOBLIN)),
    (2, Some(&SKELETON)),
]);

pub static DUNGEON_TREASURE: RollMany<&'static ItemTemplate> = RollMany::new(&[
    (25, &GOLD),
    (15, &HEALING_POTION),
    (8, &SWORD),
    (6, &LEATHER_ARMOR),
    (5, &HELMET),
    (3, &CHAIN_MAIL),
    (2, &RING_OF_VIGOR),
]);

pub static GLADE_CREATURES: RollOne<Option<&'static CreatureType>> =
    RollOne::new(&[(5, None), (3, Some(&DEER)), (1, Some(&BOAR))]);

pub static GLADE_FORAGE: RollMany<&'static ItemTemplate> =
    RollMany::new(&[(40, &MUSHROOM), (5, &HEALING_POTION)]);

pub fn creature_type(key: &str) -> Result<&'static CreatureType, WorldError> {
    CREATURE_TYPES
        .iter()
        .copied()
        .find(|t| t.key == key)
        .ok_or_else(|| WorldError::UnknownCreatureType(key.to_string()))
}

pub fn item_template(key: &str) -> Result<&'static ItemTemplate, WorldError> {
    ITEM_TEMPLATES
        .iter()
        .copied()
        .find(|t| t.key == key)
        .ok_or_else(|| WorldError::UnknownItemTemplate(key.to_string()))
}

// Behaviors

fn rat() -> Box<dyn Behavior> {
    Box::new(chain(vec![
        Box::new(Guard::around_self(5)),
        Box::new(maybe_idle(Wander, 30)),
    ]))
}

fn goblin() -> Box<dyn Behavior> {
    Box::new(chain(vec![
        Box::new(Retaliate::new()),
        Box::new(Guard::around_home(6)),
        Box::new(ReturnHome::new(8)),
        Box::new(maybe_idle(roam(5), 50)),
    ]))
}

fn skeleton() -> Box<dyn Behavior> {
    Box::new(chain(vec![
        Box::new(Guard::around_home(4)),
        Box::new(ReturnHome::new(1)),
    ]))
}

fn deer() -> Box<dyn Behavior> {
    Box::new(chain(vec![
        Box::new(Startle::new()),
        Box::new(maybe_idle(roam(6), 60)),
    ]))
}

fn boar() -> Box<dyn Behavior> {
    Box::new(chain(vec![
        Box::new(Retaliate::new()),
        Box::new(maybe_idle(roam(4), 50)),
    ]))
}

fn hermit() -> Box<dyn Behavior> {
    Box::new(maybe_idle(roam(3), 80))
}

/// AI for a player nobody is steering: fight what comes close, drink a
/// potion when badly hurt, pick things up, and head for the stairs.
pub fn autopilot() -> Box<dyn Behavior> {
    Box::new(chain(vec![
        Box::new(drink_when_hurt),
        Box::new(Guard::around_self(6)),
        Box::new(interact_underfoot),
        Box::new(PathFinding::new(Box::new(
            |_actor: CreatureId, world: &World, rejected: Option<Coord>| -> Result<Option<Coord>, WorldError> {
                Ok(stairs_ahead(world).filter(|s| Some(*s) != rejected))
            },
        ))),
        Box::new(roam(10)),
    ]))
}

fn drink_when_hurt(actor: CreatureId, world: &World) -> Decision {
    let me = world.creature(actor)?;
    if me.health * 2 > me.health_max(world.items()) {
        return Ok(None);
    }
    let potion: Option<ItemId> = me.inventory.iter().copied().find(|id| {
        world
            .items()
            .get(*id)
            .is_some_and(|i| matches!(i.template.use_effect, Some(UseEffect::Heal(_))))
    });
    Ok(potion.map(|item| Box::new(UseItem { user: actor, item }) as Box<dyn Action>))
}

fn interact_underfoot(actor: CreatureId, world: &World) -> Decision {
    let position = world.creature(actor)?.position;
    let cell = world.get_map_tile(position);
    let wanted = !cell.items.is_empty()
        || (cell.terrain == Terrain::StairsDown && stairs_ahead(world).is_some());
    Ok(wanted.then(|| Box::new(Interact::new(actor, position)) as Box<dyn Action>))
}

/// The stairs of the current zone, if they lead anywhere.
fn stairs_ahead(world: &World) -> Option<Coord> {
    world.zone().and_then(|z| z.stairs_to)?;
    world
        .map()
        .cells(|_, cell| cell.terrain == Terrain::StairsDown, None)
        .first()
        .map(|(c, _)| *c)
}

// Scripts

/// Talks to the player, and trades a healing potion for a mushroom.
pub struct HermitScript;

impl CreatureScript for HermitScript {
    fn name(&self) -> &'static str {
        "hermit"
    }

    fn on_interact(
        &self,
        creature: CreatureId,
        actor: CreatureId,
        world: &mut World,
    ) -> Result<bool, WorldError> {
        if !world.is_player(actor) {
            return Ok(false);
        }
        world.show_speech(
            Some(creature),
            &[
                "Mushrooms. The pale ones, from the clearings.",
                "Bring me one and I'll give you something better.",
            ],
        );
        Ok(true)
    }

    fn on_trade(
        &self,
        creature: CreatureId,
        giver: CreatureId,
        item: ItemId,
        world: &mut World,
    ) -> Result<(), WorldError> {
        if world.item(item)?.template.key != MUSHROOM.key {
            world.show_message("The hermit turns it over and shrugs.");
            return Ok(());
        }
        let me = world.creature(creature)?.position;
        let reward = world.add_map_item(me, &HEALING_POTION)?;
        world.give_item(reward, giver)?;
        world.remove_map_item(item);
        world.show_message("The hermit hands over a healing potion.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Give};
    use crate::testing::room;

    #[test]
    fn lookups_find_every_entry() {
        for kind in CREATURE_TYPES {
            assert_eq!(creature_type(kind.key).unwrap(), kind);
        }
        for template in ITEM_TEMPLATES {
            assert_eq!(item_template(template.key).unwrap(), template);
        }
        assert!(matches!(
            creature_type("dragon"),
            Err(WorldError::UnknownCreatureType(_))
        ));
        assert!(matches!(
            item_template("excalibur"),
            Err(WorldError::UnknownItemTemplate(_))
        ));
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in CREATURE_TYPES.iter().enumerate() {
            assert!(CREATURE_TYPES[i + 1..].iter().all(|b| a.key != b.key));
        }
        for (i, a) in ITEM_TEMPLATES.iter().enumerate() {
            assert!(ITEM_TEMPLATES[i + 1..].iter().all(|b| a.key != b.key));
        }
    }

    #[test]
    fn player_starts_armed() {
        let mut world = room(5, 5);
        let player = world.add_player(&PLAYER, Coord::new(2, 2)).unwrap();
        let creature = world.creature(player).unwrap();
        let wielded = creature.equipment.get(&Slot::MainHand).copied().unwrap();
        assert_eq!(world.item(wielded).unwrap().template.key, "dagger");
        assert_eq!(world.attribute(player, Attribute::Melee).unwrap(), 3);
        assert_eq!(creature.inventory.len(), 1, "Potion stays in the pack");
    }

    #[test]
    fn every_type_spawns_with_its_scripts() {
        let mut world = room(20, 3);
        for (i, kind) in CREATURE_TYPES.iter().enumerate() {
            world.add_creature(kind, Coord::new(i as i32 * 2, 1)).unwrap();
        }
        assert_eq!(world.creature_count(), CREATURE_TYPES.len());
    }

    #[test]
    fn hermit_trades_potion_for_mushroom() {
        let mut world = room(5, 5);
        let player = world.add_player(&PLAYER, Coord::new(1, 1)).unwrap();
        let hermit = world.add_creature(&HERMIT, Coord::new(2, 1)).unwrap();
        let mushroom = world.add_map_item(Coord::new(1, 1), &MUSHROOM).unwrap();
        world.give_item(mushroom, player).unwrap();

        let outcome = Give {
            giver: player,
            receiver: hermit,
            item: mushroom,
        }
        .execute(&mut world)
        .unwrap();

        assert!(outcome.is_ok());
        assert!(world.item(mushroom).is_err(), "The hermit eats the mushroom");
        let potions = world
            .creature(player)
            .unwrap()
            .inventory
            .iter()
            .filter(|id| world.item(**id).unwrap().template.key == "healing_potion")
            .count();
        assert_eq!(potions, 2);
    }

    #[test]
    fn hermit_speaks_to_player_only() {
        let mut world = room(5, 5);
        let player = world.add_player(&PLAYER, Coord::new(1, 1)).unwrap();
        let hermit = world.add_creature(&HERMIT, Coord::new(2, 1)).unwrap();
        let rat = world.add_creature(&RAT, Coord::new(2, 2)).unwrap();

        assert!(!HermitScript.on_interact(hermit, rat, &mut world).unwrap());
        assert!(world.prompt().is_none());
        assert!(HermitScript.on_interact(hermit, player, &mut world).unwrap());
        assert_eq!(world.prompt().map(|p| p.len()), Some(2));
    }

    #[test]
    fn autopilot_drinks_when_hurt() {
        let mut world = room(5, 5);
        let player = world.add_player(&PLAYER, Coord::new(1, 1)).unwrap();
        assert!(drink_when_hurt(player, &world).unwrap().is_none());
        world.creature_mut(player).unwrap().health = 4;
        let action = drink_when_hurt(player, &world).unwrap().expect("should drink");
        action.execute(&mut world).unwrap();
        assert_eq!(world.creature(player).unwrap().health, 9);
    }
}

//! The text console: a table of commands keyed by name, parsed by splitting
//! the input line on whitespace.
//!
//! Commands that take game time return an action for the player's next turn.
//! Everything else (help, inventory, mistakes) answers with a message and
//! costs nothing.

use crate::action::{Action, DropItem, Interact, Move, Noop, UseItem};
use crate::entity::{CreatureId, ItemId};
use crate::util::geometry::Direction;
use crate::world::{World, WorldError};

type Handler = fn(&[&str], CreatureId, &mut World) -> Result<Option<Box<dyn Action>>, WorldError>;

pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    handler: Handler,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

pub static COMMANDS: &[Command] = &[
    Command {
        name: "move",
        aliases: &["m", "go"],
        usage: "move <north|east|south|west>",
        help: "Step one cell. Walking into an enemy attacks it.",
        handler: move_player,
    },
    Command {
        name: "wait",
        aliases: &["z", "rest"],
        usage: "wait",
        help: "Let a turn pass.",
        handler: wait,
    },
    Command {
        name: "get",
        aliases: &["g", "take"],
        usage: "get",
        help: "Pick up what lies here, or take the stairs.",
        handler: get,
    },
    Command {
        name: "say",
        aliases: &["talk", "open"],
        usage: "say <direction>",
        help: "Talk to whoever stands in that direction, or work a door.",
        handler: say,
    },
    Command {
        name: "use",
        aliases: &["u", "wear", "drink"],
        usage: "use <item>",
        help: "Use a carried item, or put on or take off a wearable one.",
        handler: use_item,
    },
    Command {
        name: "drop",
        aliases: &["d"],
        usage: "drop <item>",
        help: "Put an item down here.",
        handler: drop_item,
    },
    Command {
        name: "inventory",
        aliases: &["i", "inv"],
        usage: "inventory",
        help: "List what you carry.",
        handler: inventory,
    },
    Command {
        name: "help",
        aliases: &["?", "h"],
        usage: "help",
        help: "Show this list.",
        handler: help,
    },
];

pub fn find(name: &str) -> Option<&'static Command> {
    let name = name.to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|c| c.name == name || c.aliases.contains(&name.as_str()))
}

/// Run one console line for the player. Returns the action to queue, if the
/// command takes a turn. Unknown commands and bad arguments are answered with
/// a message.
pub fn execute(line: &str, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };
    let Some(command) = find(name) else {
        world.show_message(format!("Unknown command '{}'. Type 'help' for a list.", name));
        return Ok(None);
    };
    let Some(player) = world.player() else {
        world.show_message("There is no one to command.");
        return Ok(None);
    };
    (command.handler)(args, player, world)
}

fn move_player(args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    match args.first().and_then(|a| Direction::parse(a)) {
        Some(direction) => Ok(Some(Box::new(Move::toward(player, direction)))),
        None => {
            world.show_message("Move where? Try 'move north'.");
            Ok(None)
        }
    }
}

fn wait(_args: &[&str], _player: CreatureId, _world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    Ok(Some(Box::new(Noop)))
}

fn get(_args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    let here = world.creature(player)?.position;
    Ok(Some(Box::new(Interact::new(player, here))))
}

fn say(args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    let Some(direction) = args.first().and_then(|a| Direction::parse(a)) else {
        world.show_message("Talk to whom? Try 'say east'.");
        return Ok(None);
    };
    let target = world.creature(player)?.position + direction.delta();
    Ok(Some(Box::new(Interact::new(player, target))))
}

fn use_item(args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    Ok(carried_item(args, player, world)?.map(|item| Box::new(UseItem { user: player, item }) as Box<dyn Action>))
}

fn drop_item(args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    Ok(carried_item(args, player, world)?.map(|item| Box::new(DropItem { actor: player, item }) as Box<dyn Action>))
}

fn inventory(_args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    let creature = world.creature(player)?;
    let mut lines = Vec::new();
    for (slot, item) in &creature.equipment {
        lines.push(format!("{} ({})", world.item(*item)?.name(), slot.name()));
    }
    for item in &creature.inventory {
        lines.push(world.item(*item)?.name().to_string());
    }
    if lines.is_empty() {
        world.show_message("You carry nothing.");
    } else {
        world.show_message(format!("You carry: {}.", lines.join(", ")));
    }
    Ok(None)
}

fn help(_args: &[&str], _player: CreatureId, world: &mut World) -> Result<Option<Box<dyn Action>>, WorldError> {
    for command in COMMANDS {
        world.show_message(format!("{:<24} {}", command.usage, command.help));
    }
    Ok(None)
}

/// The first carried or worn item whose name starts with the joined
/// arguments, ignoring case.
fn carried_item(args: &[&str], player: CreatureId, world: &mut World) -> Result<Option<ItemId>, WorldError> {
    let wanted = args.join(" ").to_ascii_lowercase();
    if wanted.is_empty() {
        world.show_message("Which item?");
        return Ok(None);
    }
    let creature = world.creature(player)?;
    let carried: Vec<ItemId> = creature
        .inventory
        .iter()
        .chain(creature.equipment.values())
        .copied()
        .collect();
    for item in carried {
        if world.item(item)?.name().to_ascii_lowercase().starts_with(&wanted) {
            return Ok(Some(item));
        }
    }
    world.show_message(format!("You have no {}.", wanted));
    Ok(None)
}

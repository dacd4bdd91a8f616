use crate::action::{capitalize, player_failure, player_success, Action, ActionOutcome};
use crate::entity::{CreatureId, ItemId};
use crate::map::Terrain;
use crate::util::geometry::{manhattan, Coord};
use crate::world::{World, WorldError};

/// Do whatever makes sense with a cell next to (or under) the actor: talk to
/// whoever stands there, pick up items, open or close a door, take the stairs.
#[derive(Debug, Clone, Copy)]
pub struct Interact {
    pub actor: CreatureId,
    pub target: Coord,
}

impl Interact {
    pub fn new(actor: CreatureId, target: Coord) -> Self {
        Self { actor, target }
    }
}

impl Action for Interact {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        let position = world.creature(self.actor)?.position;
        if manhattan(position, self.target) > 1 {
            return Ok(ActionOutcome::failed());
        }

        if let Some(other) = world.map().creature(self.target).filter(|c| *c != self.actor) {
            if world.notify_interact(other, self.actor)? {
                return Ok(ActionOutcome::done());
            }
            let text = format!("{} ignores you.", capitalize(&world.describe(other)));
            return Ok(player_failure(world, self.actor, text));
        }

        let items: Vec<ItemId> = world.map().items(self.target).to_vec();
        if !items.is_empty() {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                names.push(format!("the {}", world.item(item)?.name()));
                world.give_item(item, self.actor)?;
            }
            return Ok(ActionOutcome::success(format!(
                "{} {} up {}.",
                capitalize(&world.describe(self.actor)),
                world.verb(self.actor, "pick", "picks"),
                join_names(&names)
            )));
        }

        match world.map().terrain(self.target) {
            Terrain::Door => {
                world.set_terrain(self.target, Terrain::OpenDoor);
                Ok(player_success(world, self.actor, "You open the door."))
            }
            Terrain::OpenDoor if world.map().creature(self.target).is_none() => {
                world.set_terrain(self.target, Terrain::Door);
                Ok(player_success(world, self.actor, "You close the door."))
            }
            Terrain::StairsDown if world.is_player(self.actor) => {
                match world.zone().and_then(|z| z.stairs_to) {
                    Some(next) => {
                        world.load_zone(next)?;
                        Ok(ActionOutcome::success("You descend the stairs."))
                    }
                    None => Ok(ActionOutcome::failure("Rubble blocks the way down.")),
                }
            }
            _ => Ok(player_failure(world, self.actor, "There is nothing to do here.")),
        }
    }
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

use crate::action::{capitalize, player_failure, Action, ActionOutcome};
use crate::entity::{CreatureId, ItemId, UseEffect};
use crate::util::geometry::manhattan;
use crate::world::{World, WorldError};

/// Hand an inventory item to a creature standing next to the giver.
#[derive(Debug, Clone, Copy)]
pub struct Give {
    pub giver: CreatureId,
    pub receiver: CreatureId,
    pub item: ItemId,
}

impl Action for Give {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        let giver = world.creature(self.giver)?;
        if !giver.inventory.contains(&self.item) {
            return Ok(player_failure(world, self.giver, "You aren't carrying that."));
        }
        let from = giver.position;
        let Some(to) = world.find_creature(self.receiver).map(|c| c.position) else {
            return Ok(ActionOutcome::failed());
        };
        if manhattan(from, to) > 1 {
            let text = format!("{} is too far away.", capitalize(&world.describe(self.receiver)));
            return Ok(player_failure(world, self.giver, text));
        }

        let name = world.item(self.item)?.name();
        world.give_item(self.item, self.receiver)?;
        let text = format!(
            "{} {} the {} to {}.",
            capitalize(&world.describe(self.giver)),
            world.verb(self.giver, "give", "gives"),
            name,
            world.describe(self.receiver)
        );
        world.notify_trade(self.receiver, self.giver, self.item)?;
        Ok(ActionOutcome::success(text))
    }
}

/// Consume a usable item, or toggle a wearable one on and off.
#[derive(Debug, Clone, Copy)]
pub struct UseItem {
    pub user: CreatureId,
    pub item: ItemId,
}

impl Action for UseItem {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        if !world.creature(self.user)?.owns(self.item) {
            return Ok(player_failure(world, self.user, "You aren't carrying that."));
        }
        let template = world.item(self.item)?.template;
        let who = capitalize(&world.describe(self.user));

        if let Some(UseEffect::Heal(amount)) = template.use_effect {
            let gained = world.heal(self.user, amount)?;
            world.remove_map_item(self.item);
            return Ok(ActionOutcome::success(format!(
                "{} {} the {} and {} {} health.",
                who,
                world.verb(self.user, "use", "uses"),
                template.name,
                world.verb(self.user, "recover", "recovers"),
                gained
            )));
        }

        if template.is_equipment() {
            if world.creature(self.user)?.equipped_slot(self.item).is_some() {
                world.unequip(self.user, self.item)?;
                return Ok(ActionOutcome::success(format!(
                    "{} {} the {}.",
                    who,
                    world.verb(self.user, "remove", "removes"),
                    template.name
                )));
            }
            if world.equip(self.user, self.item, None)? {
                return Ok(ActionOutcome::success(format!(
                    "{} {} the {}.",
                    who,
                    world.verb(self.user, "equip", "equips"),
                    template.name
                )));
            }
            let text = format!("There is no free slot for the {}.", template.name);
            return Ok(player_failure(world, self.user, text));
        }

        let text = format!("You can't use the {}.", template.name);
        Ok(player_failure(world, self.user, text))
    }
}

/// Put a carried or worn item down on the creature's cell.
#[derive(Debug, Clone, Copy)]
pub struct DropItem {
    pub actor: CreatureId,
    pub item: ItemId,
}

impl Action for DropItem {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        let creature = world.creature(self.actor)?;
        if !creature.owns(self.item) {
            return Ok(player_failure(world, self.actor, "You aren't carrying that."));
        }
        let position = creature.position;
        let name = world.item(self.item)?.name();
        world.move_map_item(self.item, position)?;
        Ok(ActionOutcome::success(format!(
            "{} {} the {}.",
            capitalize(&world.describe(self.actor)),
            world.verb(self.actor, "drop", "drops"),
            name
        )))
    }
}

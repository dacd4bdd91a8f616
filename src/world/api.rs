//! Operations available to scripts, behaviors and actions.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::action::Action;
use crate::behavior::Behavior;
use crate::combat::AttackReport;
use crate::entity::{
    Attribute, Creature, CreatureId, CreatureType, Item, ItemId, ItemTemplate, Items, Owner, Slot,
};
use crate::map::{Map, MapCell, Terrain};
use crate::util::geometry::Coord;
use crate::util::random::Random;
use crate::world::{zone, World, WorldError, WorldEvent, WorldScript, Zone};

impl World {
    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn get_map_tile(&self, c: Coord) -> &MapCell {
        self.map.cell(c)
    }

    pub fn set_terrain(&mut self, c: Coord, terrain: Terrain) {
        self.map.set_terrain(c, terrain);
    }

    pub fn random(&self) -> &Random {
        &self.random
    }

    pub fn zone(&self) -> Option<&'static Zone> {
        self.zone
    }

    pub fn items(&self) -> &Items {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Result<&Item, WorldError> {
        self.items.get(id).ok_or(WorldError::UnknownItem(id))
    }

    // Creatures

    /// Living creatures in scheduling order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.order.iter().filter_map(|id| self.creatures.get(id))
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    pub fn creature(&self, id: CreatureId) -> Result<&Creature, WorldError> {
        self.creatures.get(&id).ok_or(WorldError::UnknownCreature(id))
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Result<&mut Creature, WorldError> {
        self.creatures.get_mut(&id).ok_or(WorldError::UnknownCreature(id))
    }

    /// Like [`World::creature`], for callers that expect creatures to vanish.
    pub fn find_creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn player(&self) -> Option<CreatureId> {
        self.player
    }

    pub fn is_player(&self, id: CreatureId) -> bool {
        self.player == Some(id)
    }

    pub fn attribute(&self, id: CreatureId, attribute: Attribute) -> Result<i32, WorldError> {
        Ok(self.creature(id)?.attribute(attribute, &self.items))
    }

    pub fn are_hostile(&self, a: CreatureId, b: CreatureId) -> Result<bool, WorldError> {
        Ok(self.creature(a)?.is_hostile_to(self.creature(b)?))
    }

    /// "you" for the player, "the goblin" for anyone else.
    pub fn describe(&self, id: CreatureId) -> String {
        match self.creatures.get(&id) {
            Some(_) if self.is_player(id) => "you".to_string(),
            Some(c) => format!("the {}", c.name()),
            None => "something".to_string(),
        }
    }

    /// Pick the verb form agreeing with [`World::describe`].
    pub fn verb(&self, id: CreatureId, second: &'static str, third: &'static str) -> &'static str {
        if self.is_player(id) { second } else { third }
    }

    /// Spawn a creature on a free, walkable cell. Its kit is created in its
    /// inventory, wearables are equipped, and its scripts' create hooks run.
    pub fn add_creature(
        &mut self,
        kind: &'static CreatureType,
        position: Coord,
    ) -> Result<CreatureId, WorldError> {
        if !self.map.is_traversable(position) {
            return Err(WorldError::CellBlocked(position));
        }
        self.next_creature_id += 1;
        let id = CreatureId(self.next_creature_id);
        self.creatures.insert(id, Creature::new(id, kind, position));
        self.map.set_creature(position, Some(id));
        self.order.push(id);
        if let Some(factory) = kind.behavior {
            self.behaviors.insert(id, factory());
        }

        for template in kind.kit {
            let item = self.items.create(template);
            self.attach(item, Owner::Inventory(id))?;
            if template.is_equipment() {
                self.equip(id, item, None)?;
            }
        }

        debug!(creature = id.0, kind = kind.key, x = position.x, y = position.y, "Creature added");
        self.emit(WorldEvent::CreatureAdded {
            creature: id,
            kind: kind.key,
            position,
        });
        self.for_each_script(id, |script, world| script.on_create(id, world))?;
        Ok(id)
    }

    /// Spawn the creature the console controls.
    pub fn add_player(
        &mut self,
        kind: &'static CreatureType,
        position: Coord,
    ) -> Result<CreatureId, WorldError> {
        let id = self.add_creature(kind, position)?;
        self.player = Some(id);
        Ok(id)
    }

    /// Remove a creature without a death: no drops, no death hooks. What it
    /// carried is destroyed. Unknown ids are ignored.
    pub fn remove_creature(&mut self, id: CreatureId) {
        let Some(creature) = self.creatures.remove(&id) else {
            return;
        };
        if self.map.creature(creature.position) == Some(id) {
            self.map.set_creature(creature.position, None);
        }
        for item in creature.belongings() {
            self.items.remove(item);
        }
        self.behaviors.remove(&id);
        self.remove_from_order(id);
        if self.player == Some(id) {
            self.player = None;
            self.player_action = None;
        }
        self.emit(WorldEvent::CreatureRemoved { creature: id });
    }

    /// Move a creature to a free, walkable cell, updating the map and the
    /// creature together, then run its move hooks.
    pub fn move_creature(&mut self, id: CreatureId, to: Coord) -> Result<(), WorldError> {
        let from = self.creature(id)?.position;
        if from == to {
            return Ok(());
        }
        if !self.map.is_traversable(to) {
            return Err(WorldError::CellBlocked(to));
        }
        self.map.set_creature(from, None);
        self.map.set_creature(to, Some(id));
        self.creature_mut(id)?.position = to;
        self.emit(WorldEvent::CreatureMoved { creature: id, from, to });
        self.for_each_script(id, |script, world| script.on_move(id, from, to, world))
    }

    pub fn set_behavior(&mut self, id: CreatureId, behavior: Box<dyn Behavior>) -> Result<(), WorldError> {
        self.creature(id)?;
        self.behaviors.insert(id, behavior);
        Ok(())
    }

    /// Queue the player's next action. Consumed by the next decision.
    pub fn set_player_action(&mut self, action: Box<dyn Action>) {
        self.player_action = Some(action);
    }

    pub fn heal(&mut self, id: CreatureId, amount: i32) -> Result<i32, WorldError> {
        let creature = self.creatures.get_mut(&id).ok_or(WorldError::UnknownCreature(id))?;
        Ok(creature.heal(amount, &self.items))
    }

    pub fn equip(&mut self, id: CreatureId, item: ItemId, slot: Option<Slot>) -> Result<bool, WorldError> {
        let creature = self.creatures.get_mut(&id).ok_or(WorldError::UnknownCreature(id))?;
        Ok(creature.equip(&mut self.items, item, slot))
    }

    pub fn unequip(&mut self, id: CreatureId, item: ItemId) -> Result<bool, WorldError> {
        let creature = self.creatures.get_mut(&id).ok_or(WorldError::UnknownCreature(id))?;
        Ok(creature.unequip(&mut self.items, item))
    }

    // Items

    /// Create an item lying on `c`.
    pub fn add_map_item(&mut self, c: Coord, template: &'static ItemTemplate) -> Result<ItemId, WorldError> {
        if !self.map.terrain(c).traversable() {
            return Err(WorldError::InvalidLocation(c));
        }
        let item = self.items.create(template);
        self.attach(item, Owner::Ground(c))?;
        Ok(item)
    }

    /// Put an existing item on the ground at `c`, wherever it was before.
    pub fn move_map_item(&mut self, item: ItemId, c: Coord) -> Result<(), WorldError> {
        if !self.map.terrain(c).traversable() {
            return Err(WorldError::InvalidLocation(c));
        }
        self.detach(item)?;
        self.attach(item, Owner::Ground(c))
    }

    /// Destroy an item wherever it is. Unknown ids are ignored.
    pub fn remove_map_item(&mut self, item: ItemId) {
        if self.items.get(item).is_none() {
            return;
        }
        if let Err(e) = self.detach(item) {
            warn!(item = item.0, error = %e, "Failed to detach item before removal");
        }
        self.items.remove(item);
    }

    /// Move an item into a creature's inventory.
    pub fn give_item(&mut self, item: ItemId, to: CreatureId) -> Result<(), WorldError> {
        self.creature(to)?;
        self.detach(item)?;
        self.attach(item, Owner::Inventory(to))
    }

    fn attach(&mut self, item: ItemId, owner: Owner) -> Result<(), WorldError> {
        match owner {
            Owner::Ground(c) => self.map.add_item(c, item),
            Owner::Inventory(id) => self.creature_mut(id)?.inventory.push(item),
            Owner::Equipment(id, slot) => {
                self.creature_mut(id)?.equipment.insert(slot, item);
            }
        }
        self.items.set_owner(item, Some(owner));
        Ok(())
    }

    fn detach(&mut self, item: ItemId) -> Result<(), WorldError> {
        let owner = self.item(item)?.owner;
        match owner {
            Some(Owner::Ground(c)) => {
                self.map.remove_item(c, item);
            }
            Some(Owner::Inventory(id)) => {
                if let Some(creature) = self.creatures.get_mut(&id) {
                    creature.inventory.retain(|i| *i != item);
                }
            }
            Some(Owner::Equipment(id, _)) => {
                if let Some(creature) = self.creatures.get_mut(&id) {
                    creature.unequip(&mut self.items, item);
                    creature.inventory.retain(|i| *i != item);
                }
            }
            None => {}
        }
        self.items.set_owner(item, None);
        Ok(())
    }

    // Queries

    /// A uniformly chosen materialized cell accepted by `filter`.
    pub fn random_location<F>(&self, filter: F) -> Option<Coord>
    where
        F: Fn(Coord, &MapCell) -> bool,
    {
        let cells = self.map.cells(filter, None);
        self.random.pick(&cells).map(|(c, _)| *c)
    }

    // Presentation and flow control

    pub fn show_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(%text, "Message");
        self.emit(WorldEvent::Message { text });
    }

    /// Open a speech prompt. The scheduler stops until it is resolved.
    pub fn show_speech(&mut self, speaker: Option<CreatureId>, lines: &[&str]) {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        self.prompt = Some(lines.clone());
        self.emit(WorldEvent::Speech { speaker, lines });
    }

    pub fn resolve_prompt(&mut self) {
        self.prompt = None;
    }

    /// Pause the scheduler for at least `delay`. Overlapping requests keep
    /// the later deadline.
    pub fn defer(&mut self, delay: Duration) {
        self.defer_at(Instant::now(), delay);
    }

    /// [`World::defer`] measured from `now`; pairs with [`World::update_at`].
    pub fn defer_at(&mut self, now: Instant, delay: Duration) {
        let until = now + delay;
        self.deferred_until = Some(self.deferred_until.map_or(until, |d| d.max(until)));
    }

    /// Request a zone change. It happens at the start of the next update.
    pub fn load_zone(&mut self, id: &str) -> Result<(), WorldError> {
        let zone = zone::find(id).ok_or_else(|| WorldError::UnknownZone(id.to_string()))?;
        self.pending_zone = Some(zone);
        Ok(())
    }

    pub fn register_script(&mut self, script: Box<dyn WorldScript>) {
        self.scripts.push(script);
    }

    // Hook dispatch used by actions

    pub(crate) fn notify_defend(
        &mut self,
        defender: CreatureId,
        attacker: CreatureId,
        report: &AttackReport,
    ) -> Result<(), WorldError> {
        self.for_each_script(defender, |script, world| {
            script.on_defend(defender, attacker, report, world)
        })
    }

    pub(crate) fn notify_trade(
        &mut self,
        receiver: CreatureId,
        giver: CreatureId,
        item: ItemId,
    ) -> Result<(), WorldError> {
        self.for_each_script(receiver, |script, world| script.on_trade(receiver, giver, item, world))
    }

    pub(crate) fn notify_interact(&mut self, target: CreatureId, actor: CreatureId) -> Result<bool, WorldError> {
        let mut handled = false;
        self.for_each_script(target, |script, world| {
            handled |= script.on_interact(target, actor, world)?;
            Ok(())
        })?;
        Ok(handled)
    }
}

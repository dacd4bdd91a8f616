pub mod api;
pub mod error;
pub mod events;
pub mod script;
pub mod statistics;
pub mod view;
pub mod zone;

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use uuid::Uuid;

use crate::action::Action;
use crate::behavior::Behavior;
use crate::entity::catalog;
use crate::entity::{Attribute, Creature, CreatureId, CreatureType, Items};
use crate::map::Map;
use crate::util::random::Random;

pub use error::WorldError;
pub use events::WorldEvent;
pub use script::{CreatureScript, WorldScript};
pub use zone::Zone;

/// Initiative spent by every decision, including one that produced no action.
pub const ACTION_COST: i32 = 100;

/// Why [`World::update`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// An effect asked for a pause; nothing ran.
    Deferred,
    /// The player has no queued action. The same creature resumes next update.
    AwaitingInput,
    /// A speech prompt is open until [`World::resolve_prompt`].
    AwaitingPrompt,
    /// A zone change was requested; it happens at the start of the next update.
    ZoneChange,
    /// Every creature had its turn.
    PassComplete,
    /// There are no creatures left to schedule.
    Idle,
}

#[derive(Debug, Clone, Default)]
pub struct WorldSettings {
    /// Pause after each resolved attack so a viewer can follow the fight.
    pub effect_delay: Duration,
}

enum Step {
    Finished,
    Removed,
    AwaitingInput,
    Interrupted,
}

/// The simulation: map, creatures, items and the initiative scheduler.
///
/// Everything runs on one thread. Scripts and actions mutate the world only
/// through the API in [`api`], so the map's creature pointers, each
/// creature's position, and each item's single owner always agree.
pub struct World {
    pub id: Uuid,
    pub seed: u64,
    zone: Option<&'static Zone>,
    map: Map,
    creatures: BTreeMap<CreatureId, Creature>,
    /// Scheduling order: insertion order of the living creatures.
    order: Vec<CreatureId>,
    behaviors: HashMap<CreatureId, Box<dyn Behavior>>,
    items: Items,
    random: Random,
    player: Option<CreatureId>,
    player_action: Option<Box<dyn Action>>,
    scripts: Vec<Box<dyn WorldScript>>,
    settings: WorldSettings,
    next_actor: usize,
    /// Turn-start hooks already ran for the creature at `next_actor`.
    actor_started: bool,
    /// The current creature is the player and is waiting for an action.
    awaiting_input: bool,
    deferred_until: Option<Instant>,
    prompt: Option<Vec<String>>,
    pending_zone: Option<&'static Zone>,
    events: Vec<WorldEvent>,
    turn: u64,
    next_creature_id: u64,
    actions_this_update: u32,
}

impl World {
    /// An empty world with no zone. Seed 0 picks a random seed.
    pub fn new(seed: u64, settings: WorldSettings) -> Self {
        let seed = Random::resolve_seed(seed);
        let random = Random::new(seed);
        Self {
            id: uuid::Builder::from_random_bytes(random.bytes()).into_uuid(),
            seed,
            zone: None,
            map: Map::new(),
            creatures: BTreeMap::new(),
            order: Vec::new(),
            behaviors: HashMap::new(),
            items: Items::new(),
            random,
            player: None,
            player_action: None,
            scripts: Vec::new(),
            settings,
            next_actor: 0,
            actor_started: false,
            awaiting_input: false,
            deferred_until: None,
            prompt: None,
            pending_zone: None,
            events: Vec::new(),
            turn: 0,
            next_creature_id: 0,
            actions_this_update: 0,
        }
    }

    /// Generate `zone_id` and place a new player at its start.
    pub fn create(zone_id: &str, seed: u64, settings: WorldSettings) -> Result<Self, WorldError> {
        let zone = zone::find(zone_id).ok_or_else(|| WorldError::UnknownZone(zone_id.to_string()))?;
        let mut world = World::new(seed, settings);
        world.enter_zone(zone, Some(&catalog::PLAYER))?;
        Ok(world)
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.awaiting_input
    }

    pub fn prompt(&self) -> Option<&[String]> {
        self.prompt.as_deref()
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Run the scheduler until the current pass completes or something needs
    /// to wait: player input, an open prompt, or an effect delay.
    pub fn update(&mut self) -> Result<UpdateStatus, WorldError> {
        self.update_at(Instant::now())
    }

    /// [`World::update`] with an explicit clock, for driving deferrals in tests.
    pub fn update_at(&mut self, now: Instant) -> Result<UpdateStatus, WorldError> {
        if let Some(until) = self.deferred_until {
            if now < until {
                return Ok(UpdateStatus::Deferred);
            }
            self.deferred_until = None;
        }
        if self.prompt.is_some() {
            return Ok(UpdateStatus::AwaitingPrompt);
        }
        if let Some(zone) = self.pending_zone.take() {
            self.enter_zone(zone, None)?;
        }

        self.actions_this_update = 0;
        let status = self.run_pass()?;
        if self.actions_this_update > 0 {
            self.emit(WorldEvent::Update);
        }
        Ok(status)
    }

    fn run_pass(&mut self) -> Result<UpdateStatus, WorldError> {
        loop {
            if self.order.is_empty() {
                self.next_actor = 0;
                self.actor_started = false;
                return Ok(UpdateStatus::Idle);
            }
            if self.next_actor >= self.order.len() {
                return self.finish_pass();
            }

            let actor = self.order[self.next_actor];
            if !self.actor_started {
                self.actor_started = true;
                self.for_each_script(actor, |script, world| script.on_turn_start(actor, world))?;
                self.purge_dead()?;
                if !self.is_current(actor) {
                    continue;
                }
            }

            match self.act(actor)? {
                Step::Finished => {}
                Step::Removed => continue,
                Step::AwaitingInput => return Ok(UpdateStatus::AwaitingInput),
                Step::Interrupted => {
                    return Ok(self.interruption().unwrap_or(UpdateStatus::PassComplete));
                }
            }

            let speed = self.attribute(actor, Attribute::Speed)?;
            self.creature_mut(actor)?.initiative += speed;
            self.for_each_script(actor, |script, world| script.on_turn_end(actor, world))?;
            self.purge_dead()?;
            if self.is_current(actor) {
                self.next_actor += 1;
            }
            self.actor_started = false;

            if self.next_actor >= self.order.len() {
                return self.finish_pass();
            }
            if let Some(status) = self.interruption() {
                return Ok(status);
            }
        }
    }

    /// Let `actor` act while its initiative wins the roll. Each decision
    /// costs [`ACTION_COST`] whether or not it produced an action, except a
    /// player with nothing queued, who waits instead.
    fn act(&mut self, actor: CreatureId) -> Result<Step, WorldError> {
        loop {
            let resuming = std::mem::take(&mut self.awaiting_input);
            if !resuming {
                let initiative = self.creature(actor)?.initiative;
                if initiative <= 0 || self.random.below(100) >= initiative {
                    return Ok(Step::Finished);
                }
            }

            let Some(action) = self.decide(actor)? else {
                if self.player == Some(actor) {
                    self.awaiting_input = true;
                    return Ok(Step::AwaitingInput);
                }
                self.creature_mut(actor)?.initiative -= ACTION_COST;
                continue;
            };

            self.creature_mut(actor)?.initiative -= ACTION_COST;
            debug!(creature = actor.0, ?action, "Executing action");
            let outcome = action.execute(self)?;
            if let Some(text) = outcome.message() {
                self.show_message(text);
            }
            self.actions_this_update += 1;

            self.purge_dead()?;
            if !self.is_current(actor) {
                return Ok(Step::Removed);
            }
            if self.interruption().is_some() {
                return Ok(Step::Interrupted);
            }
        }
    }

    fn decide(&mut self, actor: CreatureId) -> Result<Option<Box<dyn Action>>, WorldError> {
        if self.player == Some(actor) {
            if let Some(action) = self.player_action.take() {
                return Ok(Some(action));
            }
        }
        let Some(mut behavior) = self.behaviors.remove(&actor) else {
            return Ok(None);
        };
        let decision = behavior.decide(actor, self);
        self.behaviors.insert(actor, behavior);
        decision
    }

    fn finish_pass(&mut self) -> Result<UpdateStatus, WorldError> {
        self.next_actor = 0;
        self.actor_started = false;
        self.turn += 1;
        self.emit(WorldEvent::Turn { turn: self.turn });
        let turn = self.turn;
        self.for_each_world_script(|script, world| script.on_turn(turn, world))?;
        self.purge_dead()?;
        Ok(UpdateStatus::PassComplete)
    }

    fn interruption(&self) -> Option<UpdateStatus> {
        if self.prompt.is_some() {
            Some(UpdateStatus::AwaitingPrompt)
        } else if self.pending_zone.is_some() {
            Some(UpdateStatus::ZoneChange)
        } else if self.deferred_until.is_some() {
            Some(UpdateStatus::Deferred)
        } else {
            None
        }
    }

    fn is_current(&self, actor: CreatureId) -> bool {
        self.order.get(self.next_actor) == Some(&actor)
    }

    /// Drop `id` from the schedule, keeping `next_actor` on the same creature.
    fn remove_from_order(&mut self, id: CreatureId) {
        let Some(index) = self.order.iter().position(|c| *c == id) else {
            return;
        };
        self.order.remove(index);
        if index < self.next_actor {
            self.next_actor -= 1;
        } else if index == self.next_actor {
            self.actor_started = false;
            self.awaiting_input = false;
        }
    }

    /// Kill every creature at zero health, in schedule order.
    fn purge_dead(&mut self) -> Result<(), WorldError> {
        loop {
            let dead = self
                .order
                .iter()
                .copied()
                .find(|id| self.creatures.get(id).is_some_and(|c| c.is_dead()));
            let Some(id) = dead else {
                return Ok(());
            };
            self.kill(id)?;
        }
    }

    fn kill(&mut self, id: CreatureId) -> Result<(), WorldError> {
        self.for_each_script(id, |script, world| script.on_death(id, world))?;
        let Some(creature) = self.creatures.get(&id) else {
            return Ok(());
        };
        let position = creature.position;
        let kind = creature.kind;
        let belongings = creature.belongings();

        for item in belongings {
            self.move_map_item(item, position)?;
        }
        let loot: Vec<_> = kind.loot.roll(&self.random).into_iter().copied().collect();
        for template in loot {
            self.add_map_item(position, template)?;
        }

        info!(creature = id.0, kind = kind.key, x = position.x, y = position.y, "Creature died");
        self.emit(WorldEvent::Death {
            creature: id,
            position,
        });
        self.for_each_world_script(|script, world| script.on_creature_death(id, position, world))?;
        self.remove_creature(id);
        Ok(())
    }

    /// Regenerate the world from `zone`. Everything but the player and what
    /// the player carries is discarded.
    fn enter_zone(
        &mut self,
        zone: &'static Zone,
        player_kind: Option<&'static CreatureType>,
    ) -> Result<(), WorldError> {
        let zone_seed = self.random.next_seed();
        let layout = zone.generate(zone_seed);

        let keep = self.player;
        for id in self.order.clone() {
            if Some(id) != keep {
                self.remove_creature(id);
            }
        }
        let carried = keep
            .and_then(|p| self.creatures.get(&p))
            .map(|c| c.belongings())
            .unwrap_or_default();
        let stale: Vec<_> = self
            .items
            .iter()
            .map(|i| i.id)
            .filter(|id| !carried.contains(id))
            .collect();
        for id in stale {
            self.items.remove(id);
        }

        self.map.clear();
        self.scripts.clear();
        self.prompt = None;
        self.deferred_until = None;
        self.pending_zone = None;
        self.player_action = None;
        self.awaiting_input = false;
        self.actor_started = false;
        self.next_actor = 0;
        self.zone = Some(zone);

        layout.stamp(&mut self.map);

        match keep {
            Some(player) => {
                self.map.set_creature(layout.start, Some(player));
                self.creature_mut(player)?.position = layout.start;
            }
            None => {
                if let Some(kind) = player_kind {
                    self.add_player(kind, layout.start)?;
                }
            }
        }
        for spawn in &layout.creatures {
            self.add_creature(spawn.kind, spawn.position)?;
        }
        for spawn in &layout.items {
            self.add_map_item(spawn.position, spawn.template)?;
        }

        info!(
            zone = zone.id,
            seed = zone_seed,
            regions = layout.regions.len(),
            creatures = self.creatures.len(),
            items = self.items.len(),
            "Entered zone"
        );
        self.emit(WorldEvent::ZoneEntered {
            zone: zone.id,
            seed: zone_seed,
        });

        for script in (zone.scripts)() {
            self.register_script(script);
        }
        self.for_each_world_script(|script, world| script.on_initialize(world))?;
        Ok(())
    }

    /// Run a hook on each of the creature's scripts in declaration order,
    /// stopping early if the creature is removed.
    pub(crate) fn for_each_script<F>(&mut self, id: CreatureId, mut hook: F) -> Result<(), WorldError>
    where
        F: FnMut(&'static dyn CreatureScript, &mut World) -> Result<(), WorldError>,
    {
        let Some(scripts) = self.creatures.get(&id).map(|c| c.kind.scripts) else {
            return Ok(());
        };
        for script in scripts {
            if !self.creatures.contains_key(&id) {
                break;
            }
            hook(*script, self)?;
        }
        Ok(())
    }

    /// Run a hook on every world script. Scripts registered by a hook are
    /// kept but only see the next event.
    pub(crate) fn for_each_world_script<F>(&mut self, mut hook: F) -> Result<(), WorldError>
    where
        F: FnMut(&mut dyn WorldScript, &mut World) -> Result<(), WorldError>,
    {
        let mut scripts = std::mem::take(&mut self.scripts);
        let mut result = Ok(());
        for script in scripts.iter_mut() {
            result = hook(script.as_mut(), self);
            if result.is_err() {
                break;
            }
        }
        scripts.append(&mut self.scripts);
        self.scripts = scripts;
        result
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("seed", &self.seed)
            .field("zone", &self.zone.map(|z| z.id))
            .field("turn", &self.turn)
            .field("creatures", &self.creatures.len())
            .field("items", &self.items.len())
            .finish()
    }
}

use crate::action::{capitalize, player_failure, Action, ActionOutcome};
use crate::combat::resolve_attack;
use crate::entity::CreatureId;
use crate::util::geometry::{is_adjacent, manhattan, Coord, Direction};
use crate::world::{World, WorldError};

/// Spend the turn doing nothing.
#[derive(Debug, Clone, Copy)]
pub struct Noop;

impl Action for Noop {
    fn execute(&self, _world: &mut World) -> Result<ActionOutcome, WorldError> {
        Ok(ActionOutcome::done())
    }
}

/// Step one cell. Bumping into a hostile creature attacks it instead.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub actor: CreatureId,
    pub delta: Coord,
}

impl Move {
    pub fn new(actor: CreatureId, delta: Coord) -> Self {
        Self { actor, delta }
    }

    pub fn toward(actor: CreatureId, direction: Direction) -> Self {
        Self::new(actor, direction.delta())
    }
}

impl Action for Move {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        if manhattan(self.delta, Coord::ZERO) != 1 {
            return Ok(ActionOutcome::failed());
        }
        let from = world.creature(self.actor)?.position;
        let to = from + self.delta;

        if world.map().is_traversable(to) {
            world.move_creature(self.actor, to)?;
            return Ok(ActionOutcome::done());
        }

        if let Some(other) = world.map().creature(to) {
            if world.are_hostile(self.actor, other)? {
                return Attack::new(self.actor, other).execute(world);
            }
            let text = format!("{} is in the way.", capitalize(&world.describe(other)));
            return Ok(player_failure(world, self.actor, text));
        }

        let text = match world.map().terrain(to).info().description {
            Some(description) => format!("You can't go that way. {}", description),
            None => "You can't go that way.".to_string(),
        };
        Ok(player_failure(world, self.actor, text))
    }
}

/// Melee attack against an adjacent creature.
#[derive(Debug, Clone, Copy)]
pub struct Attack {
    pub attacker: CreatureId,
    pub target: CreatureId,
}

impl Attack {
    pub fn new(attacker: CreatureId, target: CreatureId) -> Self {
        Self { attacker, target }
    }
}

impl Action for Attack {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError> {
        let from = world.creature(self.attacker)?.position;
        let Some(to) = world.find_creature(self.target).map(|c| c.position) else {
            return Ok(ActionOutcome::failed());
        };
        if !is_adjacent(from, to) {
            let text = format!("{} is out of reach.", capitalize(&world.describe(self.target)));
            return Ok(player_failure(world, self.attacker, text));
        }

        let report = resolve_attack(world, self.attacker, self.target)?;

        let attacker = capitalize(&world.describe(self.attacker));
        let target = world.describe(self.target);
        let text = if !report.success {
            format!("{} {} {}.", attacker, world.verb(self.attacker, "miss", "misses"), target)
        } else if report.killed {
            format!("{} {} {}!", attacker, world.verb(self.attacker, "kill", "kills"), target)
        } else {
            format!(
                "{} {} {} for {} damage.",
                attacker,
                world.verb(self.attacker, "hit", "hits"),
                target,
                report.health_lost
            )
        };

        let delay = world.settings().effect_delay;
        if !delay.is_zero() {
            world.defer(delay);
        }
        Ok(ActionOutcome::success(text))
    }
}

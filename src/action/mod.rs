//! Actions: the unit of change a creature commits to on its turn.

pub mod basic;
pub mod interact;
pub mod item;

use std::fmt;

use crate::entity::CreatureId;
use crate::world::{World, WorldError};

pub use basic::{Attack, Move, Noop};
pub use interact::Interact;
pub use item::{DropItem, Give, UseItem};

/// What happened when an action ran. Failing is a normal outcome: the step
/// was blocked, the slot was full. Broken invariants are `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Silent(bool),
    Message(String, bool),
}

impl ActionOutcome {
    pub fn done() -> Self {
        ActionOutcome::Silent(true)
    }

    pub fn failed() -> Self {
        ActionOutcome::Silent(false)
    }

    pub fn success(text: impl Into<String>) -> Self {
        ActionOutcome::Message(text.into(), true)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        ActionOutcome::Message(text.into(), false)
    }

    pub fn is_ok(&self) -> bool {
        match self {
            ActionOutcome::Silent(ok) | ActionOutcome::Message(_, ok) => *ok,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ActionOutcome::Silent(_) => None,
            ActionOutcome::Message(text, _) => Some(text),
        }
    }
}

impl From<bool> for ActionOutcome {
    fn from(ok: bool) -> Self {
        ActionOutcome::Silent(ok)
    }
}

impl From<String> for ActionOutcome {
    fn from(text: String) -> Self {
        ActionOutcome::success(text)
    }
}

impl From<&str> for ActionOutcome {
    fn from(text: &str) -> Self {
        ActionOutcome::success(text)
    }
}

pub trait Action: fmt::Debug {
    fn execute(&self, world: &mut World) -> Result<ActionOutcome, WorldError>;
}

/// Failure text is only worth showing when the player caused it.
pub(crate) fn player_failure(world: &World, actor: CreatureId, text: impl Into<String>) -> ActionOutcome {
    if world.is_player(actor) {
        ActionOutcome::failure(text)
    } else {
        ActionOutcome::failed()
    }
}

pub(crate) fn player_success(world: &World, actor: CreatureId, text: impl Into<String>) -> ActionOutcome {
    if world.is_player(actor) {
        ActionOutcome::success(text)
    } else {
        ActionOutcome::done()
    }
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

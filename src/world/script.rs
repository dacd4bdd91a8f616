use crate::combat::AttackReport;
use crate::entity::{CreatureId, ItemId};
use crate::util::geometry::Coord;
use crate::world::{World, WorldError};

/// Hooks attached to a creature type. Every creature of the type runs the
/// same script instances, so per-creature state goes in the creature's
/// script data, never in the script.
///
/// Hooks run in the order the type lists its scripts. A hook may kill or
/// remove its creature; later hooks for that creature are then skipped.
pub trait CreatureScript: Sync {
    fn name(&self) -> &'static str;

    fn on_create(&self, _creature: CreatureId, _world: &mut World) -> Result<(), WorldError> {
        Ok(())
    }

    fn on_turn_start(&self, _creature: CreatureId, _world: &mut World) -> Result<(), WorldError> {
        Ok(())
    }

    fn on_turn_end(&self, _creature: CreatureId, _world: &mut World) -> Result<(), WorldError> {
        Ok(())
    }

    fn on_move(
        &self,
        _creature: CreatureId,
        _from: Coord,
        _to: Coord,
        _world: &mut World,
    ) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called after an attack against `creature` resolved, hit or miss.
    fn on_defend(
        &self,
        _creature: CreatureId,
        _attacker: CreatureId,
        _report: &AttackReport,
        _world: &mut World,
    ) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called while the dying creature is still on the map.
    fn on_death(&self, _creature: CreatureId, _world: &mut World) -> Result<(), WorldError> {
        Ok(())
    }

    /// `item` has just been placed in `creature`'s inventory by `giver`.
    fn on_trade(
        &self,
        _creature: CreatureId,
        _giver: CreatureId,
        _item: ItemId,
        _world: &mut World,
    ) -> Result<(), WorldError> {
        Ok(())
    }

    /// Returns true when the interaction was handled.
    fn on_interact(
        &self,
        _creature: CreatureId,
        _actor: CreatureId,
        _world: &mut World,
    ) -> Result<bool, WorldError> {
        Ok(false)
    }
}

/// Hooks attached to the world for the lifetime of one zone.
pub trait WorldScript {
    fn name(&self) -> &'static str;

    /// Runs once after the zone is generated and populated.
    fn on_initialize(&mut self, _world: &mut World) -> Result<(), WorldError> {
        Ok(())
    }

    /// Runs at the end of every full pass over the creature list.
    fn on_turn(&mut self, _turn: u64, _world: &mut World) -> Result<(), WorldError> {
        Ok(())
    }

    fn on_creature_death(
        &mut self,
        _creature: CreatureId,
        _position: Coord,
        _world: &mut World,
    ) -> Result<(), WorldError> {
        Ok(())
    }
}

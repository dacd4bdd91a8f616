//! Sensors: creature scripts that keep derived facts about a creature's
//! surroundings in its script data, and the accessors behaviors read them with.
//!
//! Every sensor owns one state type. Reading a state the creature's type
//! never installed is a configuration error and fails loudly.

mod scripts;

use std::collections::HashSet;

use crate::entity::CreatureId;
use crate::util::geometry::{Coord, Direction};
use crate::world::{World, WorldError};

pub use scripts::{
    AgeSensor, FacingSensor, HomeSensor, NearbyCreaturesSensor, RetaliationSensor, StartleSensor,
    VisibilitySensor,
};

/// A piece of script data owned by one sensor.
pub trait SensorState: 'static {
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facing(pub Direction);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Home(pub Coord);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Startled {
    /// Where the last scare came from.
    pub threat: Option<Coord>,
    /// Bumped on every new scare so behaviors can tell one from the next.
    pub sequence: u64,
    /// Turns left before nearby creatures can startle again.
    pub calm: u32,
}

/// Creatures within the sensor's radius, nearest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NearbyCreatures(pub Vec<CreatureId>);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Visible(pub HashSet<Coord>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastAggressor(pub Option<CreatureId>);

impl SensorState for Facing {
    const NAME: &'static str = "facing";
}

impl SensorState for Age {
    const NAME: &'static str = "age";
}

impl SensorState for Home {
    const NAME: &'static str = "home";
}

impl SensorState for Startled {
    const NAME: &'static str = "startle";
}

impl SensorState for NearbyCreatures {
    const NAME: &'static str = "nearby creatures";
}

impl SensorState for Visible {
    const NAME: &'static str = "visibility";
}

impl SensorState for LastAggressor {
    const NAME: &'static str = "retaliation";
}

pub fn read<T: SensorState>(world: &World, creature: CreatureId) -> Result<&T, WorldError> {
    world
        .creature(creature)?
        .script_data
        .get::<T>()
        .ok_or(WorldError::MissingSensorData {
            creature,
            sensor: T::NAME,
        })
}

pub(crate) fn write<T: SensorState>(
    world: &mut World,
    creature: CreatureId,
    value: T,
) -> Result<(), WorldError> {
    world.creature_mut(creature)?.script_data.insert(value);
    Ok(())
}

pub(crate) fn update<T: SensorState>(
    world: &mut World,
    creature: CreatureId,
    change: impl FnOnce(&mut T),
) -> Result<(), WorldError> {
    let data = &mut world.creature_mut(creature)?.script_data;
    match data.get_mut::<T>() {
        Some(state) => {
            change(state);
            Ok(())
        }
        None => Err(WorldError::MissingSensorData {
            creature,
            sensor: T::NAME,
        }),
    }
}

pub fn facing(world: &World, creature: CreatureId) -> Result<Direction, WorldError> {
    read::<Facing>(world, creature).map(|f| f.0)
}

pub fn age(world: &World, creature: CreatureId) -> Result<u64, WorldError> {
    read::<Age>(world, creature).map(|a| a.0)
}

pub fn home(world: &World, creature: CreatureId) -> Result<Coord, WorldError> {
    read::<Home>(world, creature).map(|h| h.0)
}

pub fn startled(world: &World, creature: CreatureId) -> Result<Startled, WorldError> {
    read::<Startled>(world, creature).copied()
}

pub fn nearby_creatures(world: &World, creature: CreatureId) -> Result<&[CreatureId], WorldError> {
    read::<NearbyCreatures>(world, creature).map(|n| n.0.as_slice())
}

pub fn visible(world: &World, creature: CreatureId) -> Result<&HashSet<Coord>, WorldError> {
    read::<Visible>(world, creature).map(|v| &v.0)
}

pub fn last_aggressor(world: &World, creature: CreatureId) -> Result<Option<CreatureId>, WorldError> {
    read::<LastAggressor>(world, creature).map(|a| a.0)
}

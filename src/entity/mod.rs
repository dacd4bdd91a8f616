pub mod catalog;
pub mod creature;
pub mod item;
pub mod script_data;

pub use creature::{Creature, CreatureId, CreatureType, Faction};
pub use item::{Attribute, Item, ItemId, ItemTemplate, Items, Modifier, Owner, Slot, UseEffect};
pub use script_data::ScriptData;

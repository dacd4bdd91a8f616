pub mod action;
pub mod behavior;
pub mod cli;
pub mod combat;
pub mod command;
pub mod config;
pub mod dungeon;
pub mod entity;
pub mod map;
pub mod sensor;
pub mod util;
pub mod world;

#[cfg(test)]
mod testing;

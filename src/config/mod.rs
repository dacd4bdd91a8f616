pub mod generation;
pub mod simulation;

pub use generation::{DungeonParams, GladeParams};
pub use simulation::SimulationConfig;

pub mod geometry;
pub mod random;
pub mod table;

pub use geometry::{Coord, Direction, Rect};
pub use random::Random;
pub use table::{RollMany, RollOne};

//! World module
//!
//! Players and the ground loot rests on.

pub mod player;
pub mod terrain;

pub use player::{PlayerDirectory, PlayerId, PlayerRoster};
pub use terrain::{FlatTerrain, HeightField, Terrain};

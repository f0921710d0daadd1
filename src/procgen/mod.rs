//! Procedural dungeon generation

mod generator;
mod room;

pub use crate::core::GeneratorConfig;
pub use generator::{Dungeon, DungeonGenerator};
pub use room::Room;

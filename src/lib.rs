//! Navigation and enemy AI for a top-down tile maze
//!
//! This crate provides:
//! - A walkability grid with A* pathfinding and Bresenham line of sight
//! - Enemy state machines (patrol, chase, retreat, confused) and ghosts
//! - Tile collision with wall sliding
//! - Room-and-corridor dungeon generation and static level loading

pub mod ai;
pub mod core;
pub mod level;
pub mod physics;
pub mod procgen;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        AgentContext, AgentController, AgentState, Enemy, Ghost, MoveIntent, Path, Target, WalkabilityGrid,
        find_path, has_line_of_sight,
    };
    pub use crate::core::{AgentConfig, AgentEvent, AgentId, Config, EventQueue, GeneratorConfig, TILE_SIZE, TileCoord};
    pub use crate::level::{LevelObject, LevelSpawns, ObjectKind};
    pub use crate::physics::{Aabb, KinematicBody, SlideParams};
    pub use crate::procgen::{Dungeon, DungeonGenerator};
    pub use glam::Vec2;
}

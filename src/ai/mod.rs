//! AI and navigation module
//!
//! Walkability grid, A* pathfinding, line of sight, steering and the agent
//! state machines built on them.

mod agent;
mod behavior;
mod ghost;
mod grid;
mod pathfinding;
mod sight;
mod steering;

pub use agent::{AgentContext, AgentController, Enemy, MoveIntent, Target};
pub use behavior::{AgentState, Senses, Transition};
pub use ghost::{Ghost, GhostController, GhostState};
pub use grid::{MAX_GRID_TILES, WalkabilityGrid};
pub use pathfinding::{Path, find_path, find_path_bounded};
pub use sight::{has_line_of_sight, tiles_clear};
pub use steering::{Flee, Jitter, Seek, SteeringBehavior};

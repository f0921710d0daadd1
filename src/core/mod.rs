//! Core module
//!
//! Shared units, configuration and the agent event queue

mod config;
mod events;
mod units;

pub use config::{AgentConfig, Config, ConfigError, GeneratorConfig, GhostConfig};
pub use events::{AgentEvent, AgentId, EventQueue};
pub use units::{TILE_SIZE, TileCoord};

//! Tunables for agents, movement and dungeon generation
//!
//! Saved and loaded as RON or JSON. Every field has a default, so partial
//! files are accepted.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::{SlideParams, SpeedProfile};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path-following enemy behavior
    pub agent: AgentConfig,
    /// Ghost behavior
    pub ghost: GhostConfig,
    /// Shared mover settings
    pub movement: SlideParams,
    /// Dungeon generation
    pub generator: GeneratorConfig,
}

/// Behavior tuning for [`crate::ai::AgentController`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Starting health
    pub max_health: i32,
    /// Distance at which the target can be noticed
    pub detection_range: f32,
    /// Health at or below which the agent retreats
    pub retreat_health_threshold: i32,
    /// Seconds between repaths while chasing
    pub chase_repath_interval: f32,
    /// Seconds between repaths while retreating
    pub retreat_repath_interval: f32,
    /// Seconds spent confused after losing the target
    pub confusion_duration: f32,
    /// Patrol points are sampled within this many tiles
    pub patrol_radius: i32,
    /// Rerolls per patrol point pick
    pub patrol_attempts: u32,
    /// Upper bound of the random pause between patrol legs
    pub patrol_max_wait: f32,
    /// How far the direct flee point lies from the agent
    pub flee_distance: f32,
    /// Fallback retreat tiles are sampled within this many tiles
    pub retreat_search_radius: i32,
    /// Fallback retreat samples per repath
    pub retreat_search_attempts: u32,
    /// Required gain in squared distance for a fallback retreat tile
    pub retreat_min_improvement: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_tolerance: f32,
    /// Per-axis jitter around the target in close combat
    pub combat_jitter: f32,
    /// Damage dealt to an unshielded target on contact
    pub contact_damage: i32,
    /// Damage taken when hitting a shielded target
    pub shield_recoil_damage: i32,
    /// Node expansion cap for each path query
    pub max_path_expansions: usize,
    /// Patrol and confused movement
    pub normal_speed: SpeedProfile,
    /// Chase and retreat movement
    pub fast_speed: SpeedProfile,
    /// Half size of the collision box
    pub hitbox_half_extents: Vec2,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            detection_range: 64.0,
            retreat_health_threshold: 40,
            chase_repath_interval: 0.5,
            retreat_repath_interval: 1.5,
            confusion_duration: 3.0,
            patrol_radius: 3,
            patrol_attempts: 10,
            patrol_max_wait: 2.0,
            flee_distance: 64.0,
            retreat_search_radius: 6,
            retreat_search_attempts: 8,
            retreat_min_improvement: 256.0,
            waypoint_tolerance: 5.0,
            combat_jitter: 4.0,
            contact_damage: 1,
            shield_recoil_damage: 20,
            max_path_expansions: 4096,
            normal_speed: SpeedProfile::new(20.0, 50.0, 50.0),
            fast_speed: SpeedProfile::new(80.0, 500.0, 500.0),
            hitbox_half_extents: Vec2::splat(4.0),
        }
    }
}

/// Behavior tuning for [`crate::ai::GhostController`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostConfig {
    /// Distance at which a sleeping ghost starts chasing
    pub wake_radius: f32,
    /// Distance beyond which a chasing ghost gives up
    pub give_up_radius: f32,
    /// Movement while chasing
    pub chase_speed: SpeedProfile,
    /// Damage dealt to the target on contact
    pub contact_damage: i32,
    /// Half size of the collision box
    pub hitbox_half_extents: Vec2,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            wake_radius: 80.0,
            give_up_radius: 160.0,
            chase_speed: SpeedProfile::new(30.0, 50.0, 50.0),
            contact_damage: 1,
            hitbox_half_extents: Vec2::splat(4.0),
        }
    }
}

/// Parameters for [`crate::procgen::DungeonGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Level width in tiles
    pub width: usize,
    /// Level height in tiles
    pub height: usize,
    /// Smallest room edge in tiles
    pub min_room_size: usize,
    /// Largest room edge in tiles
    pub max_room_size: usize,
    /// Room placement attempts before giving up
    pub placement_attempts: u32,
    /// Target room count before difficulty scaling
    pub base_room_count: usize,
    /// Upper bound on the target room count
    pub room_cap: usize,
    /// Random samples per spawned item before it is skipped
    pub spawn_attempts: u32,
    /// Chance that an enemy marker is a ghost
    pub ghost_chance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            min_room_size: 6,
            max_room_size: 12,
            placement_attempts: 50,
            base_room_count: 10,
            room_cap: 20,
            spawn_attempts: 10,
            ghost_chance: 0.5,
        }
    }
}

impl GeneratorConfig {
    /// Default settings on a square level that grows with difficulty
    #[must_use]
    pub fn for_difficulty(difficulty: u32) -> Self {
        let size = (40 + difficulty as usize * 2).min(100);
        Self {
            width: size,
            height: size,
            ..Self::default()
        }
    }

    /// `ghost_chance` as a usable probability. Out-of-range values are clamped
    /// and non-finite ones fall back to the default.
    #[must_use]
    pub fn ghost_probability(&self) -> f64 {
        if self.ghost_chance.is_finite() {
            self.ghost_chance.clamp(0.0, 1.0)
        } else {
            Self::default().ghost_chance
        }
    }
}

impl Config {
    /// Save to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, ron_string)?;
        Ok(())
    }

    /// Load from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Save to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load from a `.ron` or `.json` file, chosen by extension
    ///
    /// # Errors
    ///
    /// Returns an error for unknown extensions or if loading fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::load_ron(path),
            Some("json") => Self::load_json(path),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or_default().to_string())),
        }
    }
}

/// Errors that can occur while reading or writing configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// File extension is neither `ron` nor `json`
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.ron");

        let mut config = Config::default();
        config.agent.detection_range = 96.0;
        config.generator.room_cap = 7;
        config.save_ron(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_roundtrip_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.json");

        let mut config = Config::default();
        config.ghost.wake_radius = 12.0;
        config.save_json(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.ghost.wake_radius, 12.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let loaded: Config = ron::from_str("(agent: (retreat_health_threshold: 30))").unwrap();
        assert_eq!(loaded.agent.retreat_health_threshold, 30);
        assert_eq!(loaded.agent.detection_range, 64.0);
        assert_eq!(loaded.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = Config::load("settings.toml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_level_size_scales_with_difficulty() {
        assert_eq!(GeneratorConfig::for_difficulty(1).width, 42);
        assert_eq!(GeneratorConfig::for_difficulty(5).height, 50);
        assert_eq!(GeneratorConfig::for_difficulty(80).width, 100);
    }

    #[test]
    fn test_ghost_probability_is_always_usable() {
        let nan: GeneratorConfig = ron::from_str("(ghost_chance: NaN)").unwrap();
        assert!(nan.ghost_chance.is_nan());
        assert_eq!(nan.ghost_probability(), 0.5);

        let with = |ghost_chance| GeneratorConfig {
            ghost_chance,
            ..GeneratorConfig::default()
        };
        assert_eq!(with(f64::NEG_INFINITY).ghost_probability(), 0.5);
        assert_eq!(with(-0.2).ghost_probability(), 0.0);
        assert_eq!(with(1.5).ghost_probability(), 1.0);
        assert_eq!(with(0.25).ghost_probability(), 0.25);
    }
}

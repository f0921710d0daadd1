//! Level initialization
//!
//! Splits a flat object list into static geometry and the agents it asks for.
//! Spawn markers never reach the geometry, so they neither block nor render.

use glam::Vec2;

use super::object::{LevelObject, ObjectKind};
use crate::ai::{Enemy, Ghost, WalkabilityGrid};
use crate::core::{AgentConfig, AgentId, GhostConfig};

/// A level ready to populate
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSpawns {
    /// Everything except spawn markers
    pub geometry: Vec<LevelObject>,
    /// Center of the first entry tile, or the origin if there is none
    pub player_start: Vec2,
    /// Centers of path-following enemy spawns
    pub walkers: Vec<Vec2>,
    /// Centers of ghost spawns
    pub ghosts: Vec<Vec2>,
}

impl LevelSpawns {
    pub fn from_objects(objects: impl IntoIterator<Item = LevelObject>) -> Self {
        let mut spawns = Self::default();
        let mut entry = None;

        for object in objects {
            match object.kind {
                ObjectKind::EnemySpawn => spawns.walkers.push(object.center()),
                ObjectKind::GhostSpawn => spawns.ghosts.push(object.center()),
                kind => {
                    if kind == ObjectKind::Entry && entry.is_none() {
                        entry = Some(object.center());
                    }
                    spawns.geometry.push(object);
                }
            }
        }

        spawns.player_start = entry.unwrap_or(Vec2::ZERO);
        spawns
    }

    /// Walkability grid over the geometry
    #[must_use]
    pub fn grid(&self) -> WalkabilityGrid {
        WalkabilityGrid::from_objects(&self.geometry)
    }

    /// Create every agent, walkers first, with consecutive ids
    #[must_use]
    pub fn spawn_agents(&self, agent: &AgentConfig, ghost: &GhostConfig) -> (Vec<Enemy>, Vec<Ghost>) {
        let mut next_id = 0_u32;
        let mut allocate = || {
            let id = AgentId(next_id);
            next_id += 1;
            id
        };

        let enemies = self
            .walkers
            .iter()
            .map(|&pos| Enemy::new(allocate(), pos, agent.clone()))
            .collect();
        let ghosts = self
            .ghosts
            .iter()
            .map(|&pos| Ghost::new(allocate(), pos, ghost.clone()))
            .collect();
        (enemies, ghosts)
    }
}

/// Where the player should head next.
///
/// Without the key this is the nearest key, or the nearest exit when the level
/// has no key. With the key it is the nearest exit.
#[must_use]
pub fn objective_target(objects: &[LevelObject], from: Vec2, has_key: bool) -> Option<Vec2> {
    let nearest = |kind: ObjectKind| {
        objects
            .iter()
            .filter(|object| object.kind == kind)
            .map(LevelObject::center)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    };

    if has_key {
        nearest(ObjectKind::Exit)
    } else {
        nearest(ObjectKind::Key).or_else(|| nearest(ObjectKind::Exit))
    }
}

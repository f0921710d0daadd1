//! Placed level objects
//!
//! Both the static level loader and the dungeon generator produce the same
//! flat list of [`LevelObject`]s. Behavior is selected by matching on the closed
//! [`ObjectKind`] set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::{TILE_SIZE, TileCoord};

/// Capability interface consumed by the walkability grid.
pub trait Placed {
    /// World position of the lower-left corner
    fn position(&self) -> Vec2;

    /// Footprint in world units
    fn size(&self) -> Vec2 {
        Vec2::splat(TILE_SIZE)
    }

    /// Whether the object blocks movement
    fn blocks_movement(&self) -> bool;
}

/// Every kind of object a level can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Solid wall
    Wall,
    /// Walkable floor tile
    Floor,
    /// Player start
    Entry,
    /// Level exit
    Exit,
    /// Level objective
    Key,
    /// Damaging floor tile
    Trap,
    /// Pickup (hearts, shields)
    Collectible,
    /// Spawn marker for a path-following enemy
    EnemySpawn,
    /// Spawn marker for a ghost
    GhostSpawn,
}

/// What happens when the player touches an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEffect {
    /// Player now holds the key
    PickUpKey,
    /// Player reached the exit
    ReachExit,
    /// Player takes damage
    Hurt,
    /// Player collects an item
    Collect,
}

impl ObjectKind {
    /// Whether objects of this kind block movement
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Whether this kind is a marker consumed by level initialization
    #[must_use]
    pub const fn is_spawn_marker(self) -> bool {
        matches!(self, Self::EnemySpawn | Self::GhostSpawn)
    }

    /// Effect of the player touching this kind of object, if any
    #[must_use]
    pub const fn contact_effect(self) -> Option<ContactEffect> {
        match self {
            Self::Key => Some(ContactEffect::PickUpKey),
            Self::Exit => Some(ContactEffect::ReachExit),
            Self::Trap => Some(ContactEffect::Hurt),
            Self::Collectible => Some(ContactEffect::Collect),
            Self::Wall | Self::Floor | Self::Entry | Self::EnemySpawn | Self::GhostSpawn => None,
        }
    }
}

/// An object placed in the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    /// What the object is
    pub kind: ObjectKind,
    /// World position of the lower-left corner
    pub position: Vec2,
    /// Footprint in world units
    pub size: Vec2,
}

impl LevelObject {
    /// A one-tile object at a world position
    #[must_use]
    pub fn new(kind: ObjectKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            size: Vec2::splat(TILE_SIZE),
        }
    }

    /// A one-tile object covering a tile
    #[must_use]
    pub fn at_tile(kind: ObjectKind, tile: TileCoord) -> Self {
        Self::new(kind, tile.origin())
    }

    /// Override the footprint
    #[must_use]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Tile containing the object's origin
    #[must_use]
    pub fn tile(&self) -> TileCoord {
        TileCoord::from_world(self.position)
    }

    /// Center of the footprint
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

impl Placed for LevelObject {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn blocks_movement(&self) -> bool {
        self.kind.blocks_movement()
    }
}

//! Axis-aligned bounding boxes in world space

use glam::Vec2;

use crate::core::{TILE_SIZE, TileCoord};

/// Axis-aligned rectangle, `min` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Lower-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    /// Create from corner and size
    #[must_use]
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Create from a center point and half extents
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            size: half_extents * 2.0,
        }
    }

    /// Bounds of a whole tile
    #[must_use]
    pub fn from_tile(tile: TileCoord) -> Self {
        Self {
            min: tile.origin(),
            size: Vec2::splat(TILE_SIZE),
        }
    }

    /// Upper-right corner
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Center point
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not overlap)
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Length of the shared span on the x axis (negative when disjoint)
    #[must_use]
    pub fn overlap_x(&self, other: &Self) -> f32 {
        self.max().x.min(other.max().x) - self.min.x.max(other.min.x)
    }

    /// Length of the shared span on the y axis (negative when disjoint)
    #[must_use]
    pub fn overlap_y(&self, other: &Self) -> f32 {
        self.max().y.min(other.max().y) - self.min.y.max(other.min.y)
    }

    /// Range of tiles this box touches, inclusive
    #[must_use]
    pub fn tile_span(&self) -> (TileCoord, TileCoord) {
        (TileCoord::from_world(self.min), TileCoord::from_world(self.max()))
    }
}

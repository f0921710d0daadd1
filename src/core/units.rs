//! Tile and world space units
//!
//! Every component shares one fixed tile size. World positions are `Vec2`;
//! tiles are integer `(col, row)` pairs. Conversions between the two are always
//! explicit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Edge length of one tile in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Integer tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column (x)
    pub col: i32,
    /// Row (y)
    pub row: i32,
}

impl TileCoord {
    /// Create a tile coordinate
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Tile containing a world position (floor division by `TILE_SIZE`)
    #[must_use]
    pub fn from_world(pos: Vec2) -> Self {
        Self {
            col: (pos.x / TILE_SIZE).floor() as i32,
            row: (pos.y / TILE_SIZE).floor() as i32,
        }
    }

    /// World position of the tile's lower-left corner
    #[must_use]
    pub fn origin(self) -> Vec2 {
        Vec2::new(self.col as f32 * TILE_SIZE, self.row as f32 * TILE_SIZE)
    }

    /// World position of the tile's center
    #[must_use]
    pub fn center(self) -> Vec2 {
        self.origin() + Vec2::splat(TILE_SIZE * 0.5)
    }

    /// Offset by a number of tiles
    #[must_use]
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }

    /// Manhattan distance in tiles
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// The four orthogonal neighbors
    #[must_use]
    pub const fn neighbors(self) -> [Self; 4] {
        [
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(-1, 0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_floors() {
        assert_eq!(TileCoord::from_world(Vec2::new(0.0, 15.9)), TileCoord::new(0, 0));
        assert_eq!(TileCoord::from_world(Vec2::new(16.0, 32.0)), TileCoord::new(1, 2));
        // Negative positions floor away from zero rather than truncating
        assert_eq!(TileCoord::from_world(Vec2::new(-0.5, -16.5)), TileCoord::new(-1, -2));
    }

    #[test]
    fn test_center_and_origin() {
        let tile = TileCoord::new(4, 4);
        assert_eq!(tile.origin(), Vec2::new(64.0, 64.0));
        assert_eq!(tile.center(), Vec2::new(72.0, 72.0));
        assert_eq!(TileCoord::from_world(tile.center()), tile);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(TileCoord::new(0, 0).manhattan(TileCoord::new(4, -3)), 7);
    }
}

//! Rectangular rooms in tile space

use rand::Rng;

use crate::core::TileCoord;

/// Axis-aligned room, `(x, y)` is the lower-left tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Strict overlap; rooms sharing only an edge line do not intersect
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Center tile, rounded toward the lower-left on even sizes
    #[must_use]
    pub fn center(&self) -> TileCoord {
        TileCoord::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.col >= self.x
            && tile.col < self.x + self.width
            && tile.row >= self.y
            && tile.row < self.y + self.height
    }

    /// Every tile of the room, row by row
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |row| (self.x..self.x + self.width).map(move |col| TileCoord::new(col, row)))
    }

    /// Random tile at least one tile away from the room's edge
    pub fn random_interior_point<R: Rng + ?Sized>(&self, rng: &mut R) -> TileCoord {
        let col = if self.width > 2 {
            rng.gen_range(self.x + 1..=self.x + self.width - 2)
        } else {
            self.x
        };
        let row = if self.height > 2 {
            rng.gen_range(self.y + 1..=self.y + self.height - 2)
        } else {
            self.y
        };
        TileCoord::new(col, row)
    }
}

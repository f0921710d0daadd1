//! Walkability grid
//!
//! Boolean occupancy map built once per level from static geometry.

use glam::Vec2;

use crate::core::{TILE_SIZE, TileCoord};
use crate::level::Placed;

/// Largest edge, in tiles, of a grid sized from object footprints
pub const MAX_GRID_TILES: usize = 1024;

/// A 2D navigation grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkabilityGrid {
    /// Width in tiles
    width: usize,
    /// Height in tiles
    height: usize,
    /// Walkable cells (true = walkable), row-major
    cells: Vec<bool>,
}

impl WalkabilityGrid {
    /// Create an all-walkable grid
    #[must_use]
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// Build a grid that covers every object's footprint plus a one-tile margin.
    ///
    /// With no objects this degrades to a minimal all-walkable grid. Each edge
    /// is capped at [`MAX_GRID_TILES`]; footprints beyond it are clipped.
    #[must_use]
    pub fn from_objects<P: Placed>(objects: &[P]) -> Self {
        let mut end_col = 1_i32;
        let mut end_row = 1_i32;
        for obj in objects {
            let (_, last) = footprint_tiles(obj);
            end_col = end_col.max(last.col.saturating_add(1));
            end_row = end_row.max(last.row.saturating_add(1));
        }

        let width = (end_col.saturating_add(1) as usize).min(MAX_GRID_TILES);
        let height = (end_row.saturating_add(1) as usize).min(MAX_GRID_TILES);
        if width == MAX_GRID_TILES || height == MAX_GRID_TILES {
            log::warn!("level footprint clipped to {width}x{height} tiles");
        }
        Self::with_size(width, height, objects)
    }

    /// Build a grid with explicit dimensions; objects outside it are clipped
    #[must_use]
    pub fn with_size<P: Placed>(width: usize, height: usize, objects: &[P]) -> Self {
        let mut grid = Self::open(width, height);
        for obj in objects.iter().filter(|obj| obj.blocks_movement()) {
            let (first, last) = footprint_tiles(obj);
            let last_col = last.col.min(width as i32 - 1);
            let last_row = last.row.min(height as i32 - 1);
            for row in first.row.max(0)..=last_row {
                for col in first.col.max(0)..=last_col {
                    grid.set_walkable(col, row, false);
                }
            }
        }
        grid
    }

    /// Width in tiles
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether a tile lies inside the grid
    #[must_use]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    /// Set a cell's walkability; out-of-range writes are ignored
    pub fn set_walkable(&mut self, col: i32, row: i32, walkable: bool) {
        if self.in_bounds(col, row) {
            let index = row as usize * self.width + col as usize;
            self.cells[index] = walkable;
        }
    }

    /// Check if a cell is walkable. Anything outside the grid is not.
    #[must_use]
    pub fn is_walkable(&self, col: i32, row: i32) -> bool {
        if !self.in_bounds(col, row) {
            return false;
        }
        self.cells[row as usize * self.width + col as usize]
    }

    /// [`Self::is_walkable`] for a tile coordinate
    #[must_use]
    pub fn is_walkable_at(&self, tile: TileCoord) -> bool {
        self.is_walkable(tile.col, tile.row)
    }

    /// Walkability of the tile containing a world position
    #[must_use]
    pub fn is_world_walkable(&self, pos: Vec2) -> bool {
        self.is_walkable_at(TileCoord::from_world(pos))
    }

    /// Walkable orthogonal neighbors of a tile
    pub fn walkable_neighbors(&self, tile: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        tile.neighbors()
            .into_iter()
            .filter(|next| self.is_walkable_at(*next))
    }

    /// Number of walkable tiles
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&walkable| walkable).count()
    }
}

/// First and last tile covered by an object's footprint, inclusive
fn footprint_tiles<P: Placed + ?Sized>(obj: &P) -> (TileCoord, TileCoord) {
    let pos = obj.position();
    let size = obj.size().max(Vec2::ZERO);
    let first = TileCoord::from_world(pos);
    let last = TileCoord::new(
        (((pos.x + size.x) / TILE_SIZE).ceil() as i32).saturating_sub(1).max(first.col),
        (((pos.y + size.y) / TILE_SIZE).ceil() as i32).saturating_sub(1).max(first.row),
    );
    (first, last)
}

//! Grid line of sight
//!
//! Discrete Bresenham walk between two tiles. Accurate to one tile width.

use glam::Vec2;

use super::grid::WalkabilityGrid;
use crate::core::TileCoord;

/// Whether every tile on the line from `from` to `to` is walkable, endpoints
/// included.
#[must_use]
pub fn has_line_of_sight(grid: &WalkabilityGrid, from: Vec2, to: Vec2) -> bool {
    tiles_clear(grid, TileCoord::from_world(from), TileCoord::from_world(to))
}

/// [`has_line_of_sight`] between two tiles
#[must_use]
pub fn tiles_clear(grid: &WalkabilityGrid, from: TileCoord, to: TileCoord) -> bool {
    let (mut x, mut y) = (from.col, from.row);
    let dx = (to.col - x).abs();
    let dy = (to.row - y).abs();
    let sx = if x < to.col { 1 } else { -1 };
    let sy = if y < to.row { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if !grid.is_walkable(x, y) {
            return false;
        }
        if x == to.col && y == to.row {
            return true;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(col: i32, row: i32) -> Vec2 {
        TileCoord::new(col, row).center()
    }

    #[test]
    fn test_clear_on_open_grid() {
        let grid = WalkabilityGrid::open(10, 10);
        assert!(has_line_of_sight(&grid, center(0, 0), center(9, 6)));
        assert!(has_line_of_sight(&grid, center(9, 6), center(0, 0)));
        assert!(has_line_of_sight(&grid, center(3, 3), center(3, 3)));
    }

    #[test]
    fn test_wall_blocks_sight() {
        let mut grid = WalkabilityGrid::open(10, 10);
        grid.set_walkable(5, 2, false);

        assert!(!has_line_of_sight(&grid, center(2, 2), center(8, 2)));
        assert!(has_line_of_sight(&grid, center(2, 4), center(8, 4)));
    }

    #[test]
    fn test_blocked_start_or_end() {
        let mut grid = WalkabilityGrid::open(5, 5);
        grid.set_walkable(0, 0, false);
        assert!(!has_line_of_sight(&grid, center(0, 0), center(4, 0)));
        assert!(!has_line_of_sight(&grid, center(4, 0), center(0, 0)));
    }

    #[test]
    fn test_diagonal_steps_slip_between_corner_walls() {
        let mut grid = WalkabilityGrid::open(6, 6);
        for i in 0..6 {
            grid.set_walkable(i, 5 - i, false);
        }
        // Pure diagonal steps move both axes at once and never touch the anti-diagonal
        assert!(has_line_of_sight(&grid, center(0, 0), center(5, 5)));
        // An axis-aligned line has to cross it
        assert!(!has_line_of_sight(&grid, center(0, 2), center(5, 2)));
    }

    #[test]
    fn test_outside_grid_is_not_visible() {
        let grid = WalkabilityGrid::open(4, 4);
        assert!(!has_line_of_sight(&grid, center(1, 1), center(6, 1)));
    }
}

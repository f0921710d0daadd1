//! Kinematic movers on the tile grid
//!
//! A body owns a center position, an axis-aligned hitbox and a velocity. Each
//! tick it approaches `input * max_speed` per axis, then moves X and Y
//! separately, reverting any axis that would overlap a non-walkable tile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::ai::WalkabilityGrid;
use crate::core::TileCoord;

/// Below this speed a body does not attempt to move
const MIN_MOVE_SPEED: f32 = 1.0;

/// Above this speed a body counts as moving
const MOVING_SPEED: f32 = 10.0;

/// Speed limit and how quickly a body gets there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    /// Top speed in world units per second
    pub max_speed: f32,
    /// Velocity change per second along an axis with input
    pub acceleration: f32,
    /// Velocity change per second along an axis without input
    pub friction: f32,
}

impl SpeedProfile {
    #[must_use]
    pub const fn new(max_speed: f32, acceleration: f32, friction: f32) -> Self {
        Self {
            max_speed,
            acceleration,
            friction,
        }
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::new(20.0, 50.0, 50.0)
    }
}

/// Wall-slide assist tuning.
///
/// When a body is stopped by a wall it only clips by a few units, it gets
/// nudged along the wall so it rounds the corner instead of sticking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideParams {
    /// Largest perpendicular overlap with the wall that still slides
    pub slide_threshold: f32,
    /// Nudge speed in world units per second
    pub slide_speed: f32,
    /// The perpendicular heading component must stay below this
    pub axis_dominance: f32,
}

impl Default for SlideParams {
    fn default() -> Self {
        Self {
            slide_threshold: 8.0,
            slide_speed: 30.0,
            axis_dominance: 0.5,
        }
    }
}

/// Which axes were reverted during a move, and what stopped them
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionReport {
    /// Tile that blocked horizontal movement
    pub blocked_x: Option<Aabb>,
    /// Tile that blocked vertical movement
    pub blocked_y: Option<Aabb>,
}

impl CollisionReport {
    /// Whether either axis was blocked
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked_x.is_some() || self.blocked_y.is_some()
    }
}

/// A body moved by velocity and resolved against the walkability grid
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    position: Vec2,
    half_extents: Vec2,
    velocity: Vec2,
    input: Vec2,
    profile: SpeedProfile,
}

impl KinematicBody {
    /// Create a body at rest centered on `position`
    #[must_use]
    pub fn new(position: Vec2, half_extents: Vec2, profile: SpeedProfile) -> Self {
        Self {
            position,
            half_extents,
            velocity: Vec2::ZERO,
            input: Vec2::ZERO,
            profile,
        }
    }

    /// Hitbox center
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Current hitbox
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    /// Desired direction, usually unit length or zero
    #[must_use]
    pub fn input(&self) -> Vec2 {
        self.input
    }

    pub fn set_input(&mut self, input: Vec2) {
        self.input = input;
    }

    #[must_use]
    pub fn profile(&self) -> SpeedProfile {
        self.profile
    }

    pub fn set_profile(&mut self, profile: SpeedProfile) {
        self.profile = profile;
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.velocity.length() > MOVING_SPEED
    }

    /// Approach the target velocity one axis at a time
    pub fn integrate(&mut self, dt: f32) {
        let target = self.input * self.profile.max_speed;
        let rate = |axis_input: f32| {
            if axis_input != 0.0 {
                self.profile.acceleration
            } else {
                self.profile.friction
            }
        };
        self.velocity = Vec2::new(
            approach(self.velocity.x, target.x, rate(self.input.x) * dt),
            approach(self.velocity.y, target.y, rate(self.input.y) * dt),
        );
    }

    /// Move along X then Y, undoing whichever axis runs into a wall
    pub fn move_and_collide(&mut self, grid: &WalkabilityGrid, dt: f32) -> CollisionReport {
        let mut report = CollisionReport::default();
        if self.velocity.length() <= MIN_MOVE_SPEED {
            return report;
        }

        let old_x = self.position.x;
        self.position.x += self.velocity.x * dt;
        if let Some(tile) = self.obstruction(grid) {
            self.position.x = old_x;
            report.blocked_x = Some(tile);
        }

        let old_y = self.position.y;
        self.position.y += self.velocity.y * dt;
        if let Some(tile) = self.obstruction(grid) {
            self.position.y = old_y;
            report.blocked_y = Some(tile);
        }

        report
    }

    /// Nudge the body around a corner it only clipped.
    ///
    /// Returns whether any nudge was applied.
    pub fn wall_slide(
        &mut self,
        grid: &WalkabilityGrid,
        dt: f32,
        direction: Vec2,
        report: &CollisionReport,
        params: &SlideParams,
    ) -> bool {
        let nudge = params.slide_speed * dt;
        let mut slid = false;

        if let Some(wall) = report.blocked_x {
            if direction.x != 0.0 && direction.y.abs() < params.axis_dominance {
                let overlap = self.bounds().overlap_y(&wall);
                if overlap > 0.0 && overlap <= params.slide_threshold {
                    let sign = if self.position.y < wall.center().y { -1.0 } else { 1.0 };
                    slid |= self.try_nudge(grid, Vec2::new(0.0, sign * nudge));
                }
            }
        }

        if let Some(wall) = report.blocked_y {
            if direction.y != 0.0 && direction.x.abs() < params.axis_dominance {
                let overlap = self.bounds().overlap_x(&wall);
                if overlap > 0.0 && overlap <= params.slide_threshold {
                    let sign = if self.position.x < wall.center().x { -1.0 } else { 1.0 };
                    slid |= self.try_nudge(grid, Vec2::new(sign * nudge, 0.0));
                }
            }
        }

        slid
    }

    /// Integrate, move and slide in one go
    pub fn step(&mut self, grid: &WalkabilityGrid, dt: f32, params: &SlideParams) -> CollisionReport {
        self.integrate(dt);
        let report = self.move_and_collide(grid, dt);
        if report.is_blocked() {
            let direction = if self.input != Vec2::ZERO {
                self.input
            } else {
                self.velocity.normalize_or_zero()
            };
            self.wall_slide(grid, dt, direction, &report, params);
        }
        report
    }

    /// Integrate and move straight through walls
    pub fn drift(&mut self, dt: f32) {
        self.integrate(dt);
        self.position += self.velocity * dt;
    }

    /// Bounds of the first non-walkable tile the hitbox overlaps
    fn obstruction(&self, grid: &WalkabilityGrid) -> Option<Aabb> {
        let bounds = self.bounds();
        let (lo, hi) = bounds.tile_span();
        (lo.col..=hi.col)
            .flat_map(|col| (lo.row..=hi.row).map(move |row| (col, row)))
            .filter(|&(col, row)| !grid.is_walkable(col, row))
            .map(|(col, row)| Aabb::from_tile(TileCoord::new(col, row)))
            .find(|tile| bounds.overlaps(tile))
    }

    fn try_nudge(&mut self, grid: &WalkabilityGrid, offset: Vec2) -> bool {
        let old = self.position;
        self.position += offset;
        if self.obstruction(grid).is_some() {
            self.position = old;
            return false;
        }
        true
    }
}

/// Move `current` toward `target` by at most `amount`
fn approach(current: f32, target: f32, amount: f32) -> f32 {
    if current < target {
        (current + amount).min(target)
    } else {
        (current - amount).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32) -> KinematicBody {
        KinematicBody::new(Vec2::new(x, y), Vec2::splat(4.0), SpeedProfile::new(20.0, 50.0, 50.0))
    }

    #[test]
    fn test_integrate_accelerates_then_caps() {
        let mut body = body_at(8.0, 8.0);
        body.set_input(Vec2::X);

        body.integrate(0.1);
        assert!((body.velocity().x - 5.0).abs() < 1e-5);
        assert_eq!(body.velocity().y, 0.0);

        for _ in 0..20 {
            body.integrate(0.1);
        }
        assert!((body.velocity().x - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_friction_brings_body_to_rest() {
        let mut body = body_at(8.0, 8.0);
        body.set_velocity(Vec2::new(-12.0, 6.0));

        for _ in 0..10 {
            body.integrate(0.1);
        }
        assert_eq!(body.velocity(), Vec2::ZERO);
        assert!(!body.is_moving());
    }

    #[test]
    fn test_wall_reverts_blocked_axis_only() {
        let mut grid = WalkabilityGrid::open(4, 4);
        grid.set_walkable(1, 0, false);
        let mut body = body_at(8.0, 8.0);
        body.set_velocity(Vec2::new(60.0, 20.0));

        let report = body.move_and_collide(&grid, 0.1);

        let wall = report.blocked_x.unwrap();
        assert_eq!(wall.min, Vec2::new(16.0, 0.0));
        assert!(report.blocked_y.is_none());
        assert_eq!(body.position(), Vec2::new(8.0, 10.0));
    }

    #[test]
    fn test_slow_body_does_not_move() {
        let grid = WalkabilityGrid::open(4, 4);
        let mut body = body_at(8.0, 8.0);
        body.set_velocity(Vec2::new(0.5, 0.5));

        let report = body.move_and_collide(&grid, 1.0);
        assert!(!report.is_blocked());
        assert_eq!(body.position(), Vec2::new(8.0, 8.0));
    }

    #[test]
    fn test_wall_slide_rounds_clipped_corner() {
        let mut grid = WalkabilityGrid::open(4, 4);
        grid.set_walkable(1, 1, false);
        // Hitbox spans y 26..34, clipping the wall tile (y 16..32) by 6
        let mut body = body_at(10.0, 30.0);
        body.set_velocity(Vec2::new(40.0, 0.0));

        let report = body.move_and_collide(&grid, 0.1);
        assert!(report.blocked_x.is_some());

        let slid = body.wall_slide(&grid, 0.1, Vec2::X, &report, &SlideParams::default());
        assert!(slid);
        assert!((body.position().y - 33.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_slide_skipped_when_nudge_is_obstructed() {
        let mut grid = WalkabilityGrid::open(4, 4);
        grid.set_walkable(1, 1, false);
        grid.set_walkable(0, 2, false);
        // Hitbox spans y 23..31; sliding up would push it into (0, 2)
        let mut body = body_at(10.0, 27.0);
        body.set_velocity(Vec2::new(40.0, 0.0));

        let report = body.move_and_collide(&grid, 0.1);
        assert!(report.blocked_x.is_some());

        assert!(!body.wall_slide(&grid, 0.1, Vec2::X, &report, &SlideParams::default()));
        assert_eq!(body.position(), Vec2::new(10.0, 27.0));
    }

    #[test]
    fn test_wall_slide_needs_dominant_axis() {
        let mut grid = WalkabilityGrid::open(4, 4);
        grid.set_walkable(1, 1, false);
        let mut body = body_at(10.0, 30.0);
        body.set_velocity(Vec2::new(40.0, 0.0));
        let report = body.move_and_collide(&grid, 0.1);

        let diagonal = Vec2::new(1.0, 1.0).normalize();
        assert!(!body.wall_slide(&grid, 0.1, diagonal, &report, &SlideParams::default()));
    }

    #[test]
    fn test_drift_ignores_walls() {
        let mut grid = WalkabilityGrid::open(4, 4);
        grid.set_walkable(1, 0, false);
        let mut body = body_at(8.0, 8.0);
        body.set_velocity(Vec2::new(100.0, 0.0));
        body.set_profile(SpeedProfile::new(100.0, 0.0, 0.0));

        body.drift(0.1);
        assert!((body.position() - Vec2::new(18.0, 8.0)).length() < 1e-4);
    }
}

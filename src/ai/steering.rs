//! Steering headings for agent movement
//!
//! Behaviors produce a unit-length heading (or zero). The heading is an
//! intent handed to the mover, never a position change.

use glam::Vec2;
use rand::Rng;

/// Trait for steering behaviors
pub trait SteeringBehavior {
    /// Desired unit heading from `position`, zero when undefined
    fn heading(&self, position: Vec2) -> Vec2;
}

/// Seek behavior - move towards target
#[derive(Debug, Clone, Copy)]
pub struct Seek {
    /// Target position
    pub target: Vec2,
}

impl Seek {
    /// Create a new seek behavior
    #[must_use]
    pub const fn new(target: Vec2) -> Self {
        Self { target }
    }
}

impl SteeringBehavior for Seek {
    fn heading(&self, position: Vec2) -> Vec2 {
        (self.target - position).normalize_or_zero()
    }
}

/// Flee behavior - move away from a threat
#[derive(Debug, Clone, Copy)]
pub struct Flee {
    /// Position to flee from
    pub threat: Vec2,
}

impl Flee {
    /// Create a new flee behavior
    #[must_use]
    pub const fn new(threat: Vec2) -> Self {
        Self { threat }
    }

    /// Point `distance` away from `position`, directly opposite the threat
    #[must_use]
    pub fn point_at(&self, position: Vec2, distance: f32) -> Vec2 {
        position + self.heading(position) * distance
    }
}

impl SteeringBehavior for Flee {
    fn heading(&self, position: Vec2) -> Vec2 {
        (position - self.threat).normalize_or_zero()
    }
}

/// Seek toward a target blurred by a random offset on each axis.
///
/// Used for close combat so agents keep shuffling around their target instead
/// of settling on it.
#[derive(Debug, Clone, Copy)]
pub struct Jitter {
    /// Center of the jitter
    pub target: Vec2,
    /// Maximum offset per axis
    pub amplitude: f32,
}

impl Jitter {
    /// Create a new jitter behavior
    #[must_use]
    pub const fn new(target: Vec2, amplitude: f32) -> Self {
        Self { target, amplitude }
    }

    /// Draw this tick's seek target
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Seek {
        if self.amplitude <= 0.0 {
            return Seek::new(self.target);
        }
        let offset = Vec2::new(
            rng.gen_range(-self.amplitude..=self.amplitude),
            rng.gen_range(-self.amplitude..=self.amplitude),
        );
        Seek::new(self.target + offset)
    }
}

//! Movement and collision on the tile grid

mod aabb;
mod mover;

pub use aabb::Aabb;
pub use mover::{CollisionReport, KinematicBody, SlideParams, SpeedProfile};

//! Ghosts
//!
//! A ghost sleeps until the target comes close, then drifts straight at it
//! through walls. It gives up once the target is far enough away. The wake and
//! give-up radii differ so a target near one edge does not make it flicker.

use glam::Vec2;
use log::debug;
use rand::Rng;

use super::agent::{AgentContext, MoveIntent, Target};
use super::steering::{Seek, SteeringBehavior};
use crate::core::{AgentEvent, AgentId, EventQueue, GhostConfig};
use crate::physics::{Aabb, KinematicBody, SpeedProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GhostState {
    #[default]
    Asleep,
    Chasing,
}

impl GhostState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Asleep => "ASLEEP",
            Self::Chasing => "CHASE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GhostController {
    id: AgentId,
    state: GhostState,
    config: GhostConfig,
}

impl GhostController {
    #[must_use]
    pub fn new(id: AgentId, config: GhostConfig) -> Self {
        Self {
            id,
            state: GhostState::Asleep,
            config,
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> GhostState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &GhostConfig {
        &self.config
    }

    /// Wake or give up by distance, then head for the target while chasing
    pub fn update<T, R>(&mut self, position: Vec2, ctx: &mut AgentContext<'_, T, R>) -> MoveIntent
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        let target_pos = ctx.target.position();
        let distance = position.distance(target_pos);

        let next = match self.state {
            GhostState::Chasing if distance > self.config.give_up_radius => GhostState::Asleep,
            GhostState::Asleep if distance < self.config.wake_radius => GhostState::Chasing,
            current => current,
        };
        if next != self.state {
            self.set_state(next, ctx.events);
        }

        match self.state {
            GhostState::Chasing => MoveIntent {
                direction: Seek::new(target_pos).heading(position),
                profile: self.config.chase_speed,
            },
            GhostState::Asleep => MoveIntent {
                direction: Vec2::ZERO,
                profile: SpeedProfile {
                    max_speed: 0.0,
                    ..self.config.chase_speed
                },
            },
        }
    }

    /// Damage the target if `bounds` touch it. Returns whether it did.
    pub fn strike<T, R>(&self, bounds: &Aabb, ctx: &mut AgentContext<'_, T, R>) -> bool
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        if !bounds.overlaps(&ctx.target.bounds()) {
            return false;
        }
        let damage = self.config.contact_damage;
        ctx.target.apply_damage(damage);
        ctx.events.push(AgentEvent::TargetHit { agent: self.id, damage });
        true
    }

    fn set_state(&mut self, next: GhostState, events: &mut EventQueue) {
        debug!("ghost {} {} -> {}", self.id.0, self.state.name(), next.name());
        events.push(AgentEvent::StateChanged {
            agent: self.id,
            from: self.state.name(),
            to: next.name(),
        });
        self.state = next;
    }
}

/// A ghost controller with its body
#[derive(Debug, Clone)]
pub struct Ghost {
    controller: GhostController,
    body: KinematicBody,
}

impl Ghost {
    #[must_use]
    pub fn new(id: AgentId, position: Vec2, config: GhostConfig) -> Self {
        let body = KinematicBody::new(position, config.hitbox_half_extents, config.chase_speed);
        Self {
            controller: GhostController::new(id, config),
            body,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &GhostController {
        &self.controller
    }

    #[must_use]
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Decide, drift through walls, then hit whatever it touches
    pub fn update<T, R>(&mut self, ctx: &mut AgentContext<'_, T, R>) -> bool
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        let intent = self.controller.update(self.body.position(), ctx);
        self.body.set_profile(intent.profile);
        self.body.set_input(intent.direction);
        self.body.drift(ctx.dt);
        self.controller.strike(&self.body.bounds(), ctx)
    }
}

//! Agent behavior states
//!
//! Each state carries only the timers that mean something while it is active.
//! Transitions are decided from a [`Senses`] snapshot so the rules can be
//! checked without a grid or a target.
//!
//! | From     | Condition                                   | To                         |
//! |----------|---------------------------------------------|----------------------------|
//! | Patrol   | target within range and visible             | Chase                      |
//! | Chase    | health at or below the retreat threshold    | Retreat                    |
//! | Chase    | target lost and beyond twice the range      | Confused                   |
//! | Retreat  | target beyond twice the range               | Confused                   |
//! | Confused | target within range                         | Retreat or Chase by health |
//! | Confused | countdown expired                           | Patrol                     |

use std::fmt;

use crate::core::AgentConfig;

/// What the agent perceives this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Senses {
    /// Distance between hitbox centers
    pub distance: f32,
    /// Unobstructed tile line to the target
    pub line_of_sight: bool,
    /// Own health
    pub health: i32,
}

/// Behavior state of a path-following agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentState {
    /// Wander between nearby points
    Patrol {
        /// Pause left before the next patrol leg
        wait_timer: f32,
    },
    /// Pursue the target
    Chase {
        /// Time until the next repath
        repath_in: f32,
    },
    /// Run away from the target
    Retreat {
        /// Time until the next repath
        repath_in: f32,
    },
    /// Stand still after losing the target
    Confused {
        /// Time left before resuming patrol
        remaining: f32,
    },
}

impl AgentState {
    /// Patrol, ready to pick a point immediately
    #[must_use]
    pub const fn patrol() -> Self {
        Self::Patrol { wait_timer: 0.0 }
    }

    /// Chase with a repath due on the next tick
    #[must_use]
    pub const fn chase() -> Self {
        Self::Chase { repath_in: 0.0 }
    }

    /// Retreat with a repath due on the next tick
    #[must_use]
    pub const fn retreat() -> Self {
        Self::Retreat { repath_in: 0.0 }
    }

    #[must_use]
    pub const fn confused(duration: f32) -> Self {
        Self::Confused {
            remaining: duration,
        }
    }

    /// State name for debugging and logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Patrol { .. } => "PATROL",
            Self::Chase { .. } => "CHASE",
            Self::Retreat { .. } => "RETREAT",
            Self::Confused { .. } => "CONFUSED",
        }
    }

    /// Whether this state moves with the fast speed profile
    #[must_use]
    pub const fn is_fast(&self) -> bool {
        matches!(self, Self::Chase { .. } | Self::Retreat { .. })
    }

    /// Whether the agent follows its route in this state
    #[must_use]
    pub const fn follows_route(&self) -> bool {
        !matches!(self, Self::Confused { .. })
    }

    /// Count down this state's timer.
    ///
    /// The patrol pause only runs while the agent has nowhere to walk.
    pub fn tick(&mut self, dt: f32, has_route: bool) {
        match self {
            Self::Patrol { wait_timer } => {
                if !has_route {
                    *wait_timer -= dt;
                }
            }
            Self::Chase { repath_in } | Self::Retreat { repath_in } => *repath_in -= dt,
            Self::Confused { remaining } => *remaining -= dt,
        }
    }

    /// Decide whether to leave this state
    #[must_use]
    pub fn evaluate(&self, senses: &Senses, config: &AgentConfig) -> Transition {
        let range = config.detection_range;
        let wounded = senses.health <= config.retreat_health_threshold;

        match *self {
            Self::Patrol { .. } => {
                if senses.distance < range && senses.line_of_sight {
                    return Transition::To(Self::chase());
                }
            }
            Self::Chase { .. } => {
                if wounded {
                    return Transition::To(Self::retreat());
                }
                let losing = senses.distance > range * 1.5 || !senses.line_of_sight;
                if losing && senses.distance > range * 2.0 {
                    return Transition::To(Self::confused(config.confusion_duration));
                }
            }
            Self::Retreat { .. } => {
                if senses.distance > range * 2.0 {
                    return Transition::To(Self::confused(config.confusion_duration));
                }
            }
            Self::Confused { remaining } => {
                if senses.distance < range {
                    let next = if wounded { Self::retreat() } else { Self::chase() };
                    return Transition::To(next);
                }
                if remaining <= 0.0 {
                    return Transition::To(Self::patrol());
                }
            }
        }

        Transition::None
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::patrol()
    }
}

/// Outcome of [`AgentState::evaluate`]
#[derive(Clone, Copy, PartialEq)]
pub enum Transition {
    /// Stay in the current state
    None,
    /// Switch to a new state
    To(AgentState),
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "Transition::None"),
            Transition::To(state) => write!(f, "Transition::To({})", state.name()),
        }
    }
}

//! Agent event queue
//!
//! Controllers report what happened during a tick (state changes, hits, path
//! failures) by pushing events. The simulation swaps the queue at the tick
//! boundary and consumers read the previous tick's events.
//!
//! # Example
//!
//! ```
//! use maze_core::core::{AgentEvent, AgentId, EventQueue};
//!
//! let mut queue = EventQueue::new();
//! queue.push(AgentEvent::PathUnavailable { agent: AgentId(3) });
//! queue.swap();
//! assert_eq!(queue.len(), 1);
//! ```

use std::collections::VecDeque;

/// Identifies the agent that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AgentId(pub u32);

/// Something an agent did or noticed during a tick
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AgentEvent {
    /// The behavior state changed
    StateChanged {
        /// Reporting agent
        agent: AgentId,
        /// Previous state name
        from: &'static str,
        /// New state name
        to: &'static str,
    },

    /// The agent damaged its target
    TargetHit {
        /// Reporting agent
        agent: AgentId,
        /// Damage dealt
        damage: i32,
    },

    /// The agent struck a shield and hurt itself
    ShieldRecoil {
        /// Reporting agent
        agent: AgentId,
        /// Damage taken
        damage: i32,
    },

    /// A new route was planned
    Repathed {
        /// Reporting agent
        agent: AgentId,
        /// Number of waypoints in the new route
        waypoints: usize,
    },

    /// A path query found no route
    PathUnavailable {
        /// Reporting agent
        agent: AgentId,
    },
}

impl AgentEvent {
    /// Agent that produced this event
    #[must_use]
    pub fn agent(&self) -> AgentId {
        match self {
            Self::StateChanged { agent, .. }
            | Self::TargetHit { agent, .. }
            | Self::ShieldRecoil { agent, .. }
            | Self::Repathed { agent, .. }
            | Self::PathUnavailable { agent } => *agent,
        }
    }
}

/// Double-buffered event queue.
///
/// Events pushed during tick N are readable during tick N+1, so the order in
/// which agents update never changes what consumers see.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this tick
    pending: VecDeque<AgentEvent>,
    /// Events from the previous tick
    processing: VecDeque<AgentEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with the given initial capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Queue an event for the next tick
    #[inline]
    pub fn push(&mut self, event: AgentEvent) {
        self.pending.push_back(event);
    }

    /// Make this tick's events readable and start a fresh pending buffer
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Events from the previous tick
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &AgentEvent> {
        self.processing.iter()
    }

    /// Take ownership of the previous tick's events
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = AgentEvent> + '_ {
        self.processing.drain(..)
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Events waiting for the next swap
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Events pushed this tick, before the swap
    pub fn pending(&self) -> impl Iterator<Item = &AgentEvent> {
        self.pending.iter()
    }

    /// Drop everything, both buffers
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue_push_and_swap() {
        let mut queue = EventQueue::new();

        queue.push(AgentEvent::TargetHit {
            agent: AgentId(1),
            damage: 10,
        });
        assert!(queue.is_empty(), "Events should not be visible before swap");
        assert_eq!(queue.pending_count(), 1);

        queue.swap();
        assert_eq!(queue.len(), 1);
        let events: Vec<_> = queue.iter().collect();
        assert!(matches!(events[0], AgentEvent::TargetHit { damage: 10, .. }));
    }

    #[test]
    fn test_event_queue_double_buffer_isolation() {
        let mut queue = EventQueue::new();

        queue.push(AgentEvent::PathUnavailable { agent: AgentId(1) });
        queue.swap();
        queue.push(AgentEvent::PathUnavailable { agent: AgentId(2) });

        let agents: Vec<_> = queue.iter().map(AgentEvent::agent).collect();
        assert_eq!(agents, vec![AgentId(1)]);

        queue.swap();
        let agents: Vec<_> = queue.iter().map(AgentEvent::agent).collect();
        assert_eq!(agents, vec![AgentId(2)]);
    }

    #[test]
    fn test_event_queue_drain() {
        let mut queue = EventQueue::new();

        queue.push(AgentEvent::StateChanged {
            agent: AgentId(0),
            from: "PATROL",
            to: "CHASE",
        });
        queue.push(AgentEvent::Repathed {
            agent: AgentId(0),
            waypoints: 4,
        });
        queue.swap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_queue_clear() {
        let mut queue = EventQueue::new();

        queue.push(AgentEvent::PathUnavailable { agent: AgentId(0) });
        queue.swap();
        queue.push(AgentEvent::PathUnavailable { agent: AgentId(0) });
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 0);
    }
}

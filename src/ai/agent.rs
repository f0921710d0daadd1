//! Path-following agent controller
//!
//! The controller decides where an agent wants to go. It never moves the agent:
//! each update returns a [`MoveIntent`] that a [`KinematicBody`] turns into
//! motion. [`Enemy`] bundles the two for callers that just want a walker.

use glam::Vec2;
use log::{debug, trace};
use rand::Rng;

use super::behavior::{AgentState, Senses, Transition};
use super::grid::WalkabilityGrid;
use super::pathfinding::{Path, find_path_bounded};
use super::sight::has_line_of_sight;
use super::steering::{Flee, Jitter, Seek, SteeringBehavior};
use crate::core::{AgentConfig, AgentEvent, AgentId, EventQueue, TileCoord};
use crate::physics::{Aabb, CollisionReport, KinematicBody, SlideParams, SpeedProfile};

/// Whatever the agent is hunting
pub trait Target {
    /// Hitbox in world space
    fn bounds(&self) -> Aabb;

    /// Point the agent aims at, the hitbox center by default
    fn position(&self) -> Vec2 {
        self.bounds().center()
    }

    /// A shielded target reflects contact damage back onto the agent
    fn is_shielded(&self) -> bool {
        false
    }

    fn apply_damage(&mut self, amount: i32);
}

/// Everything an agent reads or writes during one update
pub struct AgentContext<'a, T: Target + ?Sized, R: Rng + ?Sized> {
    /// Seconds since the previous update
    pub dt: f32,
    pub grid: &'a WalkabilityGrid,
    pub target: &'a mut T,
    pub rng: &'a mut R,
    pub events: &'a mut EventQueue,
}

/// Desired movement for this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    /// Unit heading, or zero to coast to a stop
    pub direction: Vec2,
    /// Speed profile for the current state
    pub profile: SpeedProfile,
}

/// A planned path and how far along it the agent is
#[derive(Debug, Clone, PartialEq)]
struct Route {
    path: Path,
    cursor: usize,
}

impl Route {
    fn new(path: Path) -> Self {
        Self { path, cursor: 0 }
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.path.len()
    }

    fn remaining(&self) -> &[Vec2] {
        self.path.waypoints().get(self.cursor..).unwrap_or_default()
    }

    /// Skip waypoints within `tolerance`, returning the next one still ahead
    fn steer(&mut self, position: Vec2, tolerance: f32) -> Option<Vec2> {
        while let Some(&waypoint) = self.path.waypoints().get(self.cursor) {
            if position.distance(waypoint) < tolerance {
                self.cursor += 1;
            } else {
                return Some(waypoint);
            }
        }
        None
    }
}

/// Patrol / chase / retreat / confused state machine for one agent
#[derive(Debug, Clone)]
pub struct AgentController {
    id: AgentId,
    state: AgentState,
    route: Option<Route>,
    health: i32,
    config: AgentConfig,
}

impl AgentController {
    /// Create a patrolling agent at full health
    #[must_use]
    pub fn new(id: AgentId, config: AgentConfig) -> Self {
        Self {
            id,
            state: AgentState::patrol(),
            route: None,
            health: config.max_health,
            config,
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> AgentState {
        self.state
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Waypoints not yet reached, `None` without a route
    #[must_use]
    pub fn remaining_route(&self) -> Option<&[Vec2]> {
        self.route.as_ref().map(Route::remaining)
    }

    /// Take damage from an outside source
    pub fn apply_damage(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount).max(0);
    }

    /// Hitbox when centered on `position`
    #[must_use]
    pub fn bounds_at(&self, position: Vec2) -> Aabb {
        Aabb::from_center(position, self.config.hitbox_half_extents)
    }

    /// Switch state immediately, reporting the change
    pub fn transition(&mut self, next: AgentState, events: &mut EventQueue) {
        let from = self.state.name();
        debug!("agent {} {} -> {}", self.id.0, from, next.name());
        events.push(AgentEvent::StateChanged {
            agent: self.id,
            from,
            to: next.name(),
        });
        if matches!(next, AgentState::Confused { .. }) {
            self.route = None;
        }
        self.state = next;
    }

    /// Run one tick of behavior for an agent centered on `position`
    pub fn update<T, R>(&mut self, position: Vec2, ctx: &mut AgentContext<'_, T, R>) -> MoveIntent
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        let target_pos = ctx.target.position();
        let senses = Senses {
            distance: position.distance(target_pos),
            line_of_sight: has_line_of_sight(ctx.grid, position, target_pos),
            health: self.health,
        };

        self.state.tick(ctx.dt, self.has_route());
        if let Transition::To(next) = self.state.evaluate(&senses, &self.config) {
            self.transition(next, ctx.events);
        }

        self.act(position, target_pos, ctx);

        if matches!(self.state, AgentState::Chase { .. }) {
            if let Some(direction) = self.engage(position, ctx) {
                return self.intent(direction);
            }
        }

        let mut direction = Vec2::ZERO;
        if self.state.follows_route() {
            let tolerance = self.config.waypoint_tolerance;
            if let Some(waypoint) = self.route.as_mut().and_then(|route| route.steer(position, tolerance)) {
                direction = Seek::new(waypoint).heading(position);
            }
        }
        self.intent(direction)
    }

    fn intent(&self, direction: Vec2) -> MoveIntent {
        let profile = if self.state.is_fast() {
            self.config.fast_speed
        } else {
            self.config.normal_speed
        };
        MoveIntent { direction, profile }
    }

    fn has_route(&self) -> bool {
        self.route.as_ref().is_some_and(|route| !route.is_exhausted())
    }

    /// Per-state planning: patrol legs and rate-limited repaths
    fn act<T, R>(&mut self, position: Vec2, target_pos: Vec2, ctx: &mut AgentContext<'_, T, R>)
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        match self.state {
            AgentState::Patrol { wait_timer } => {
                if !self.has_route() && wait_timer <= 0.0 {
                    self.pick_patrol_point(position, ctx.grid, ctx.rng, ctx.events);
                    let wait = ctx.rng.gen_range(0.0..=self.config.patrol_max_wait.max(0.0));
                    self.state = AgentState::Patrol { wait_timer: wait };
                }
            }
            AgentState::Chase { repath_in } => {
                if repath_in <= 0.0 {
                    match self.plan(ctx.grid, position, target_pos) {
                        Some(path) => self.follow(path, ctx.events),
                        None => {
                            self.route = None;
                            self.report_unavailable(ctx.events);
                        }
                    }
                    self.state = AgentState::Chase {
                        repath_in: self.config.chase_repath_interval,
                    };
                }
            }
            AgentState::Retreat { repath_in } => {
                if repath_in <= 0.0 || !self.has_route() {
                    self.repath_retreat(position, target_pos, ctx);
                }
            }
            AgentState::Confused { .. } => {}
        }
    }

    /// Close combat. Returns the jittered heading while touching the target.
    fn engage<T, R>(&mut self, position: Vec2, ctx: &mut AgentContext<'_, T, R>) -> Option<Vec2>
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        let bounds = self.bounds_at(position);
        if !bounds.overlaps(&ctx.target.bounds()) {
            return None;
        }

        if ctx.target.is_shielded() {
            let damage = self.config.shield_recoil_damage;
            self.apply_damage(damage);
            ctx.events.push(AgentEvent::ShieldRecoil { agent: self.id, damage });
        } else {
            let damage = self.config.contact_damage;
            ctx.target.apply_damage(damage);
            ctx.events.push(AgentEvent::TargetHit { agent: self.id, damage });
        }

        if self.health <= self.config.retreat_health_threshold {
            self.transition(AgentState::retreat(), ctx.events);
            // The chase route leads straight back into the target
            self.route = None;
            let target_pos = ctx.target.position();
            self.repath_retreat(position, target_pos, ctx);
            return None;
        }

        let seek = Jitter::new(ctx.target.position(), self.config.combat_jitter).sample(ctx.rng);
        Some(seek.heading(bounds.center()))
    }

    /// Plan a retreat leg and restart the retreat repath timer
    fn repath_retreat<T, R>(&mut self, position: Vec2, target_pos: Vec2, ctx: &mut AgentContext<'_, T, R>)
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        match self.plan_retreat(position, target_pos, ctx.grid, ctx.rng) {
            Some(path) => self.follow(path, ctx.events),
            // Keep whatever route is left
            None => self.report_unavailable(ctx.events),
        }
        self.state = AgentState::Retreat {
            repath_in: self.config.retreat_repath_interval,
        };
    }

    fn pick_patrol_point<R: Rng + ?Sized>(
        &mut self,
        position: Vec2,
        grid: &WalkabilityGrid,
        rng: &mut R,
        events: &mut EventQueue,
    ) {
        let origin = TileCoord::from_world(position);
        let radius = self.config.patrol_radius.max(0);

        for _ in 0..self.config.patrol_attempts {
            let tile = origin.offset(rng.gen_range(-radius..=radius), rng.gen_range(-radius..=radius));
            if !grid.is_walkable_at(tile) {
                continue;
            }
            let point = tile.center();
            if !has_line_of_sight(grid, position, point) {
                continue;
            }
            if let Some(path) = self.plan(grid, position, point) {
                self.follow(path, events);
                return;
            }
        }
        trace!("agent {} found no patrol point", self.id.0);
    }

    /// Route away from the target: straight flee point first, then sampling
    fn plan_retreat<R: Rng + ?Sized>(
        &self,
        position: Vec2,
        target_pos: Vec2,
        grid: &WalkabilityGrid,
        rng: &mut R,
    ) -> Option<Path> {
        let flee_point = Flee::new(target_pos).point_at(position, self.config.flee_distance);
        if grid.is_world_walkable(flee_point) {
            if let Some(path) = self.plan(grid, position, flee_point) {
                return Some(path);
            }
        }

        let origin = TileCoord::from_world(position);
        let radius = self.config.retreat_search_radius.max(0);
        let required = position.distance_squared(target_pos) + self.config.retreat_min_improvement;

        for _ in 0..self.config.retreat_search_attempts {
            let tile = origin.offset(rng.gen_range(-radius..=radius), rng.gen_range(-radius..=radius));
            if !grid.is_walkable_at(tile) {
                continue;
            }
            let candidate = tile.center();
            if candidate.distance_squared(target_pos) <= required {
                continue;
            }
            if let Some(path) = self.plan(grid, position, candidate) {
                return Some(path);
            }
        }
        None
    }

    fn plan(&self, grid: &WalkabilityGrid, from: Vec2, to: Vec2) -> Option<Path> {
        find_path_bounded(grid, from, to, self.config.max_path_expansions)
    }

    fn follow(&mut self, path: Path, events: &mut EventQueue) {
        trace!("agent {} repathed, {} waypoints", self.id.0, path.len());
        events.push(AgentEvent::Repathed {
            agent: self.id,
            waypoints: path.len(),
        });
        self.route = Some(Route::new(path));
    }

    fn report_unavailable(&self, events: &mut EventQueue) {
        trace!("agent {} has no path in {}", self.id.0, self.state.name());
        events.push(AgentEvent::PathUnavailable { agent: self.id });
    }
}

/// A controller driving a body through the grid
#[derive(Debug, Clone)]
pub struct Enemy {
    controller: AgentController,
    body: KinematicBody,
}

impl Enemy {
    /// Spawn a patrolling walker centered on `position`
    #[must_use]
    pub fn new(id: AgentId, position: Vec2, config: AgentConfig) -> Self {
        let body = KinematicBody::new(position, config.hitbox_half_extents, config.normal_speed);
        Self {
            controller: AgentController::new(id, config),
            body,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &AgentController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AgentController {
        &mut self.controller
    }

    #[must_use]
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    /// Decide, then move
    pub fn update<T, R>(&mut self, ctx: &mut AgentContext<'_, T, R>, slide: &SlideParams) -> CollisionReport
    where
        T: Target + ?Sized,
        R: Rng + ?Sized,
    {
        let intent = self.controller.update(self.body.position(), ctx);
        self.body.set_profile(intent.profile);
        self.body.set_input(intent.direction);
        self.body.step(ctx.grid, ctx.dt, slide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Debug)]
    struct Dummy {
        center: Vec2,
        shielded: bool,
        damage_taken: i32,
    }

    impl Dummy {
        fn at(tile: TileCoord) -> Self {
            Self {
                center: tile.center(),
                shielded: false,
                damage_taken: 0,
            }
        }
    }

    impl Target for Dummy {
        fn bounds(&self) -> Aabb {
            Aabb::from_center(self.center, Vec2::splat(4.0))
        }

        fn is_shielded(&self) -> bool {
            self.shielded
        }

        fn apply_damage(&mut self, amount: i32) {
            self.damage_taken += amount;
        }
    }

    struct Harness {
        grid: WalkabilityGrid,
        target: Dummy,
        rng: ChaCha8Rng,
        events: EventQueue,
    }

    impl Harness {
        fn new(grid: WalkabilityGrid, target: TileCoord) -> Self {
            Self {
                grid,
                target: Dummy::at(target),
                rng: ChaCha8Rng::seed_from_u64(42),
                events: EventQueue::new(),
            }
        }

        fn tick(&mut self, agent: &mut AgentController, position: Vec2, dt: f32) -> MoveIntent {
            let mut ctx = AgentContext {
                dt,
                grid: &self.grid,
                target: &mut self.target,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            agent.update(position, &mut ctx)
        }

        fn pending_count(&self, pred: impl Fn(&AgentEvent) -> bool) -> usize {
            self.events.pending().filter(|event| pred(event)).count()
        }
    }

    fn agent() -> AgentController {
        AgentController::new(AgentId(1), AgentConfig::default())
    }

    fn at(col: i32, row: i32) -> Vec2 {
        TileCoord::new(col, row).center()
    }

    #[test]
    fn test_patrol_ignores_distant_target() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(15, 15));
        let mut agent = agent();

        h.tick(&mut agent, at(2, 2), 0.1);
        assert_eq!(agent.state().name(), "PATROL");
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::StateChanged { .. })), 0);
    }

    #[test]
    fn test_patrol_to_chase_when_visible() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(5, 2));
        let mut agent = agent();

        let intent = h.tick(&mut agent, at(2, 2), 0.1);

        assert_eq!(agent.state().name(), "CHASE");
        assert_eq!(intent.profile, AgentConfig::default().fast_speed);
        // Repath happens on entry; the first waypoint is the agent's own tile
        assert!((intent.direction - Vec2::X).length() < 1e-4);
        assert_eq!(agent.remaining_route().map(<[Vec2]>::len), Some(3));
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::Repathed { .. })), 1);
    }

    #[test]
    fn test_patrol_needs_line_of_sight() {
        let mut grid = WalkabilityGrid::open(20, 20);
        for row in 0..20 {
            grid.set_walkable(4, row, false);
        }
        let mut h = Harness::new(grid, TileCoord::new(6, 2));
        let mut agent = agent();

        h.tick(&mut agent, at(2, 2), 0.1);
        assert_eq!(agent.state().name(), "PATROL");
    }

    #[test]
    fn test_patrol_picks_nearby_point_then_waits() {
        let origin = TileCoord::new(10, 10);
        let mut walked = 0;

        for seed in 0..16 {
            let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(19, 19));
            h.rng = ChaCha8Rng::seed_from_u64(seed);
            let mut agent = agent();

            h.tick(&mut agent, origin.center(), 0.1);

            assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::Repathed { .. })), 1);
            match agent.state() {
                AgentState::Patrol { wait_timer } => assert!((0.0..=2.0).contains(&wait_timer)),
                other => panic!("unexpected state {other:?}"),
            }

            // Picking the agent's own tile leaves nothing ahead
            let route = agent.remaining_route().unwrap();
            let Some(&goal) = route.last() else {
                continue;
            };
            let goal_tile = TileCoord::from_world(goal);
            assert_ne!(goal_tile, origin);
            assert!((goal_tile.col - origin.col).abs() <= 3, "seed {seed}: {goal_tile:?}");
            assert!((goal_tile.row - origin.row).abs() <= 3, "seed {seed}: {goal_tile:?}");
            walked += 1;
        }

        // Own-tile picks are 1 in 49
        assert!(walked >= 8, "only {walked} of 16 picks moved the agent");
    }

    #[test]
    fn test_chase_retreats_when_wounded() {
        let mut h = Harness::new(WalkabilityGrid::open(40, 40), TileCoord::new(35, 35));
        let mut agent = agent();
        agent.transition(AgentState::chase(), &mut h.events);
        agent.apply_damage(60);
        assert_eq!(agent.health(), 40);

        h.tick(&mut agent, at(2, 2), 0.1);
        assert_eq!(agent.state().name(), "RETREAT");
    }

    #[test]
    fn test_chase_loses_distant_target() {
        let mut h = Harness::new(WalkabilityGrid::open(40, 40), TileCoord::new(30, 2));
        let mut agent = agent();
        agent.transition(AgentState::chase(), &mut h.events);

        let intent = h.tick(&mut agent, at(2, 2), 0.1);

        assert_eq!(agent.state().name(), "CONFUSED");
        assert!(agent.remaining_route().is_none());
        assert_eq!(intent.direction, Vec2::ZERO);
        assert_eq!(intent.profile, AgentConfig::default().normal_speed);
    }

    #[test]
    fn test_chase_repath_is_rate_limited() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(6, 2));
        let mut agent = agent();
        agent.transition(AgentState::chase(), &mut h.events);

        h.tick(&mut agent, at(2, 2), 0.1);
        h.tick(&mut agent, at(2, 2), 0.1);
        h.tick(&mut agent, at(2, 2), 0.1);
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::Repathed { .. })), 1);

        h.tick(&mut agent, at(2, 2), 0.5);
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::Repathed { .. })), 2);
    }

    #[test]
    fn test_chase_without_path_stands_still() {
        let mut grid = WalkabilityGrid::open(20, 20);
        for tile in TileCoord::new(5, 5).neighbors() {
            grid.set_walkable(tile.col, tile.row, false);
        }
        let mut h = Harness::new(grid, TileCoord::new(5, 5));
        let mut agent = agent();
        agent.transition(AgentState::chase(), &mut h.events);

        let intent = h.tick(&mut agent, at(3, 5), 0.1);

        assert_eq!(agent.state().name(), "CHASE");
        assert_eq!(intent.direction, Vec2::ZERO);
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::PathUnavailable { .. })), 1);
    }

    #[test]
    fn test_confused_returns_to_patrol() {
        let mut h = Harness::new(WalkabilityGrid::open(40, 40), TileCoord::new(35, 35));
        let mut agent = agent();
        agent.transition(AgentState::confused(3.0), &mut h.events);

        for _ in 0..2 {
            let intent = h.tick(&mut agent, at(2, 2), 1.0);
            assert_eq!(intent.direction, Vec2::ZERO);
            assert_eq!(agent.state().name(), "CONFUSED");
        }
        h.tick(&mut agent, at(2, 2), 1.0);
        assert_eq!(agent.state().name(), "PATROL");
    }

    #[test]
    fn test_confused_wakes_without_sight() {
        let mut grid = WalkabilityGrid::open(20, 20);
        grid.set_walkable(3, 2, false);
        let mut h = Harness::new(grid, TileCoord::new(4, 2));
        let mut agent = agent();
        agent.transition(AgentState::confused(3.0), &mut h.events);

        h.tick(&mut agent, at(2, 2), 0.1);
        assert_eq!(agent.state().name(), "CHASE");
    }

    #[test]
    fn test_contact_damages_target() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(5, 5));
        let mut agent = agent();
        agent.transition(AgentState::chase(), &mut h.events);

        let position = at(5, 5) + Vec2::new(3.0, 0.0);
        let intent = h.tick(&mut agent, position, 0.1);

        assert_eq!(h.target.damage_taken, 1);
        assert_eq!(agent.health(), 100);
        assert!(intent.direction.length() <= 1.0 + 1e-4);
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::TargetHit { damage: 1, .. })), 1);
    }

    #[test]
    fn test_shield_recoil_drives_retreat() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(5, 5));
        h.target.shielded = true;
        let mut agent = agent();
        agent.transition(AgentState::chase(), &mut h.events);
        let position = at(5, 5) + Vec2::new(3.0, 0.0);

        h.tick(&mut agent, position, 0.1);
        assert_eq!(agent.health(), 80);
        h.tick(&mut agent, position, 0.1);
        assert_eq!(agent.state().name(), "CHASE");

        let intent = h.tick(&mut agent, position, 0.1);
        assert_eq!(agent.health(), 40);
        assert_eq!(agent.state().name(), "RETREAT");
        assert_eq!(intent.profile, AgentConfig::default().fast_speed);

        // Same tick: already walking the retreat route, away from the target
        assert!(intent.direction.x > 0.9, "heading {:?}", intent.direction);
        let goal = *agent.remaining_route().and_then(<[Vec2]>::last).unwrap();
        assert_eq!(TileCoord::from_world(goal), TileCoord::new(9, 5));
        match agent.state() {
            AgentState::Retreat { repath_in } => assert!(repath_in > 1.0),
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(h.target.damage_taken, 0);
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::ShieldRecoil { .. })), 3);
    }

    #[test]
    fn test_retreat_flees_away_from_target() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(8, 10));
        let mut agent = agent();
        agent.transition(AgentState::retreat(), &mut h.events);

        let intent = h.tick(&mut agent, at(10, 10), 0.1);

        assert_eq!(agent.state().name(), "RETREAT");
        assert!(intent.direction.x > 0.9);
        let goal = *agent.remaining_route().and_then(<[Vec2]>::last).unwrap();
        assert_eq!(TileCoord::from_world(goal), TileCoord::new(14, 10));
    }

    #[test]
    fn test_retreat_samples_when_flee_point_is_off_grid() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(16, 10));
        let mut agent = agent();
        agent.transition(AgentState::retreat(), &mut h.events);
        let position = at(18, 10);
        let target = h.target.center;

        for _ in 0..10 {
            h.tick(&mut agent, position, 0.01);
            if agent.remaining_route().is_some() {
                break;
            }
        }

        let goal = *agent.remaining_route().and_then(<[Vec2]>::last).unwrap();
        let required = position.distance_squared(target) + 256.0;
        assert!(goal.distance_squared(target) > required);
    }

    #[test]
    fn test_cornered_retreat_reports_no_path() {
        let mut grid = WalkabilityGrid::open(20, 20);
        for tile in TileCoord::new(10, 10).neighbors() {
            grid.set_walkable(tile.col, tile.row, false);
        }
        let mut h = Harness::new(grid, TileCoord::new(8, 10));
        let mut agent = agent();
        agent.transition(AgentState::retreat(), &mut h.events);

        let intent = h.tick(&mut agent, at(10, 10), 0.1);

        assert_eq!(intent.direction, Vec2::ZERO);
        assert!(agent.remaining_route().is_none());
        assert_eq!(h.pending_count(|e| matches!(e, AgentEvent::PathUnavailable { .. })), 1);
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut agent = agent();
        agent.apply_damage(250);
        assert_eq!(agent.health(), 0);
        assert!(agent.is_dead());
    }

    #[test]
    fn test_enemy_walks_toward_visible_target() {
        let mut h = Harness::new(WalkabilityGrid::open(20, 20), TileCoord::new(5, 2));
        let mut enemy = Enemy::new(AgentId(7), at(2, 2), AgentConfig::default());
        let start = enemy.position();

        for _ in 0..10 {
            let mut ctx = AgentContext {
                dt: 0.05,
                grid: &h.grid,
                target: &mut h.target,
                rng: &mut h.rng,
                events: &mut h.events,
            };
            enemy.update(&mut ctx, &SlideParams::default());
        }

        assert_eq!(enemy.controller().state().name(), "CHASE");
        assert!(enemy.position().x > start.x);
        assert!(enemy.body().is_moving());
    }
}

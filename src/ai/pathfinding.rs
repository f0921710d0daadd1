//! A* pathfinding on the walkability grid
//!
//! Search nodes live in an arena for the duration of one call. Parents are
//! arena indices, so reconstructing a path is a walk over plain integers.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec2;
use rustc_hash::FxHashMap;

use super::grid::WalkabilityGrid;
use crate::core::TileCoord;

/// Ordered world-space waypoints (tile centers), start to goal inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Waypoints in world coordinates
    waypoints: Vec<Vec2>,
    /// Total polyline length in world units
    length: f32,
}

impl Path {
    fn from_waypoints(waypoints: Vec<Vec2>) -> Self {
        let length = waypoints.windows(2).map(|pair| pair[0].distance(pair[1])).sum();
        Self { waypoints, length }
    }

    /// The waypoints
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Number of waypoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True only for a path without waypoints (never produced by the search)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of tile steps
    #[must_use]
    pub fn cost(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Total polyline length in world units
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Final waypoint
    #[must_use]
    pub fn goal(&self) -> Option<Vec2> {
        self.waypoints.last().copied()
    }

    /// Consume into the waypoint list
    #[must_use]
    pub fn into_waypoints(self) -> Vec<Vec2> {
        self.waypoints
    }
}

type NodeId = usize;

/// A* search node. Identity is the tile alone.
#[derive(Debug, Clone)]
struct SearchNode {
    tile: TileCoord,
    parent: Option<NodeId>,
    g_cost: u32,
    h_cost: u32,
    closed: bool,
}

impl SearchNode {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.tile == other.tile
    }
}

impl Eq for SearchNode {}

/// Frontier entry for the priority queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_cost: u32,
    g_cost: u32,
    node: NodeId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Node storage for one search
#[derive(Debug, Default)]
struct SearchArena {
    nodes: Vec<SearchNode>,
    index: FxHashMap<TileCoord, NodeId>,
}

impl SearchArena {
    fn node_for(&mut self, tile: TileCoord, h_cost: u32) -> NodeId {
        if let Some(&id) = self.index.get(&tile) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            tile,
            parent: None,
            g_cost: u32::MAX,
            h_cost,
            closed: false,
        });
        self.index.insert(tile, id);
        id
    }

    fn retrace(&self, goal: NodeId) -> Vec<Vec2> {
        let mut waypoints = Vec::new();
        let mut current = Some(goal);
        while let Some(id) = current {
            let node = &self.nodes[id];
            waypoints.push(node.tile.center());
            current = node.parent;
        }
        waypoints.reverse();
        waypoints
    }
}

/// Find a path between two world positions.
///
/// Returns `None` when either endpoint is outside the grid, the goal tile is
/// not walkable, or no route exists. Start and goal in the same tile yield a
/// single-waypoint path.
#[must_use]
pub fn find_path(grid: &WalkabilityGrid, start: Vec2, goal: Vec2) -> Option<Path> {
    find_path_bounded(grid, start, goal, usize::MAX)
}

/// [`find_path`] that gives up after expanding `max_expansions` nodes
#[must_use]
pub fn find_path_bounded(
    grid: &WalkabilityGrid,
    start: Vec2,
    goal: Vec2,
    max_expansions: usize,
) -> Option<Path> {
    let start_tile = TileCoord::from_world(start);
    let goal_tile = TileCoord::from_world(goal);

    if !grid.in_bounds(start_tile.col, start_tile.row) || !grid.is_walkable_at(goal_tile) {
        return None;
    }

    let mut arena = SearchArena::default();
    let mut open_set = BinaryHeap::new();

    let start_id = arena.node_for(start_tile, start_tile.manhattan(goal_tile));
    arena.nodes[start_id].g_cost = 0;
    open_set.push(OpenEntry {
        f_cost: arena.nodes[start_id].f_cost(),
        g_cost: 0,
        node: start_id,
    });

    let mut expansions = 0_usize;
    while let Some(entry) = open_set.pop() {
        let current = &arena.nodes[entry.node];
        // Stale entry left behind by a cheaper reinsert
        if current.closed || entry.g_cost != current.g_cost {
            continue;
        }

        if current.tile == goal_tile {
            return Some(Path::from_waypoints(arena.retrace(entry.node)));
        }

        expansions += 1;
        if expansions > max_expansions {
            log::trace!("A* gave up after {max_expansions} expansions");
            return None;
        }

        let current_tile = current.tile;
        let next_g = current.g_cost + 1;
        arena.nodes[entry.node].closed = true;

        for next in grid.walkable_neighbors(current_tile) {
            let id = arena.node_for(next, next.manhattan(goal_tile));
            let neighbor = &mut arena.nodes[id];
            if neighbor.closed || next_g >= neighbor.g_cost {
                continue;
            }
            neighbor.g_cost = next_g;
            neighbor.parent = Some(entry.node);
            open_set.push(OpenEntry {
                f_cost: neighbor.f_cost(),
                g_cost: next_g,
                node: id,
            });
        }
    }

    None
}

//! Room-and-corridor dungeon generation
//!
//! The level starts as solid wall. Rooms are placed by rejection sampling and
//! carved out, consecutive rooms are joined by two-tile-wide L corridors, and
//! finally entry, exit, key, enemy and trap markers are dropped onto free floor.
//! All randomness comes from the caller's RNG, so a seeded RNG reproduces the
//! same dungeon.

use log::debug;
use rand::Rng;

use super::room::Room;
use crate::ai::WalkabilityGrid;
use crate::core::{GeneratorConfig, TileCoord};
use crate::level::{LevelObject, LevelSpawns, ObjectKind};

/// A generated level
#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    /// Rooms in placement order; the first holds the entry, the last the exit
    pub rooms: Vec<Room>,
    /// One wall or floor per tile, followed by markers
    pub objects: Vec<LevelObject>,
}

impl Dungeon {
    #[must_use]
    pub fn grid(&self) -> WalkabilityGrid {
        WalkabilityGrid::with_size(self.width, self.height, &self.objects)
    }

    /// Tiles holding objects of `kind`
    pub fn tiles_of(&self, kind: ObjectKind) -> impl Iterator<Item = TileCoord> + '_ {
        self.objects
            .iter()
            .filter(move |object| object.kind == kind)
            .map(LevelObject::tile)
    }

    #[must_use]
    pub fn entry(&self) -> Option<TileCoord> {
        self.tiles_of(ObjectKind::Entry).next()
    }

    #[must_use]
    pub fn exit(&self) -> Option<TileCoord> {
        self.tiles_of(ObjectKind::Exit).next()
    }

    #[must_use]
    pub fn key(&self) -> Option<TileCoord> {
        self.tiles_of(ObjectKind::Key).next()
    }

    /// Split into geometry and spawn points
    #[must_use]
    pub fn spawns(&self) -> LevelSpawns {
        LevelSpawns::from_objects(self.objects.iter().copied())
    }
}

/// Dungeon generator
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    config: GeneratorConfig,
}

impl DungeonGenerator {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a level. Higher difficulty means more rooms, enemies and traps.
    pub fn generate<R: Rng + ?Sized>(&self, difficulty: u32, rng: &mut R) -> Dungeon {
        let mut map = TileMap::new(self.config.width, self.config.height);

        let rooms = self.place_rooms(difficulty, &mut map, rng);
        for pair in rooms.windows(2) {
            map.connect(&pair[0], &pair[1], rng);
        }

        let mut objects = map.tile_objects();
        let tile_count = objects.len();
        self.place_markers(difficulty, &rooms, &mut map, &mut objects, rng);

        debug!(
            "generated {}x{} dungeon at difficulty {}: {} rooms, {} markers",
            self.config.width,
            self.config.height,
            difficulty,
            rooms.len(),
            objects.len() - tile_count
        );

        Dungeon {
            width: self.config.width,
            height: self.config.height,
            rooms,
            objects,
        }
    }

    fn place_rooms<R: Rng + ?Sized>(&self, difficulty: u32, map: &mut TileMap, rng: &mut R) -> Vec<Room> {
        let config = &self.config;
        let target = (config.base_room_count + difficulty as usize).min(config.room_cap);
        let min_size = config.min_room_size.max(3) as i32;
        let max_size = (config.max_room_size as i32).max(min_size);

        let mut rooms: Vec<Room> = Vec::new();
        for _ in 0..config.placement_attempts {
            if rooms.len() >= target {
                break;
            }

            let width = rng.gen_range(min_size..=max_size);
            let height = rng.gen_range(min_size..=max_size);
            // Leave the border ring intact
            if width + 2 > map.width || height + 2 > map.height {
                continue;
            }
            let x = rng.gen_range(1..=map.width - width - 1);
            let y = rng.gen_range(1..=map.height - height - 1);

            let room = Room::new(x, y, width, height);
            if rooms.iter().any(|placed| placed.intersects(&room)) {
                continue;
            }
            map.carve_room(&room);
            rooms.push(room);
        }
        rooms
    }

    fn place_markers<R: Rng + ?Sized>(
        &self,
        difficulty: u32,
        rooms: &[Room],
        map: &mut TileMap,
        objects: &mut Vec<LevelObject>,
        rng: &mut R,
    ) {
        let (Some(first), Some(last)) = (rooms.first(), rooms.last()) else {
            return;
        };
        let mut place = |map: &mut TileMap, kind: ObjectKind, tile: TileCoord| {
            map.occupy(tile);
            objects.push(LevelObject::at_tile(kind, tile));
        };

        let entry = first.center();
        place(map, ObjectKind::Entry, entry);

        let mut exit = last.center();
        if !map.is_free(exit) {
            // Only one room: entry already sits on its center
            exit = map.nearest_free(last, exit).unwrap_or(exit);
        }
        place(map, ObjectKind::Exit, exit);

        let key = if rooms.len() >= 3 {
            rooms[rng.gen_range(1..rooms.len() - 1)].center()
        } else {
            let shifted = exit.offset(2, 0);
            let candidate = if map.in_bounds(shifted) { shifted } else { exit.offset(-2, 0) };
            if map.is_free(candidate) {
                candidate
            } else {
                map.nearest_free(last, candidate).unwrap_or(candidate)
            }
        };
        place(map, ObjectKind::Key, key);

        let enemies_per_room = 1 + difficulty / 2;
        let traps_per_room = 1 + difficulty / 3;
        let ghost_chance = self.config.ghost_probability();

        for room in &rooms[1..] {
            for _ in 0..enemies_per_room {
                let Some(tile) = map.free_random_point(room, self.config.spawn_attempts, rng) else {
                    continue;
                };
                let kind = if rng.gen_bool(ghost_chance) {
                    ObjectKind::GhostSpawn
                } else {
                    ObjectKind::EnemySpawn
                };
                place(map, kind, tile);
            }

            for _ in 0..traps_per_room {
                if let Some(tile) = map.free_random_point(room, self.config.spawn_attempts, rng) {
                    place(map, ObjectKind::Trap, tile);
                }
            }
        }
    }
}

/// Floor and occupancy bookkeeping while a dungeon is being built
struct TileMap {
    width: i32,
    height: i32,
    floor: Vec<bool>,
    occupied: Vec<bool>,
}

impl TileMap {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            floor: vec![false; width * height],
            occupied: vec![false; width * height],
        }
    }

    fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.col >= 0 && tile.row >= 0 && tile.col < self.width && tile.row < self.height
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        self.in_bounds(tile)
            .then(|| tile.row as usize * self.width as usize + tile.col as usize)
    }

    /// Turn a tile into floor unless it is on the outer ring
    fn carve(&mut self, col: i32, row: i32) {
        if col > 0 && col < self.width - 1 && row > 0 && row < self.height - 1 {
            let index = row as usize * self.width as usize + col as usize;
            self.floor[index] = true;
        }
    }

    fn carve_room(&mut self, room: &Room) {
        for tile in room.tiles() {
            self.carve(tile.col, tile.row);
        }
    }

    /// L-shaped corridor between two room centers, elbow chosen at random
    fn connect<R: Rng + ?Sized>(&mut self, from: &Room, to: &Room, rng: &mut R) {
        let (a, b) = (from.center(), to.center());
        if rng.gen_bool(0.5) {
            self.carve_horizontal(a.col, b.col, a.row);
            self.carve_vertical(a.row, b.row, b.col);
        } else {
            self.carve_vertical(a.row, b.row, a.col);
            self.carve_horizontal(a.col, b.col, b.row);
        }
    }

    fn carve_horizontal(&mut self, col_a: i32, col_b: i32, row: i32) {
        for col in col_a.min(col_b)..=col_a.max(col_b) {
            self.carve(col, row);
            self.carve(col, row + 1);
        }
    }

    fn carve_vertical(&mut self, row_a: i32, row_b: i32, col: i32) {
        for row in row_a.min(row_b)..=row_a.max(row_b) {
            self.carve(col, row);
            self.carve(col + 1, row);
        }
    }

    fn is_free(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .is_some_and(|index| self.floor[index] && !self.occupied[index])
    }

    fn occupy(&mut self, tile: TileCoord) {
        if let Some(index) = self.index(tile) {
            self.occupied[index] = true;
        }
    }

    /// Closest free tile of `room` to `from`, ties broken by row then column
    fn nearest_free(&self, room: &Room, from: TileCoord) -> Option<TileCoord> {
        room.tiles()
            .filter(|&tile| self.is_free(tile))
            .min_by_key(|&tile| (tile.manhattan(from), tile.row, tile.col))
    }

    fn free_random_point<R: Rng + ?Sized>(&self, room: &Room, attempts: u32, rng: &mut R) -> Option<TileCoord> {
        (0..attempts)
            .map(|_| room.random_interior_point(rng))
            .find(|&tile| self.is_free(tile))
    }

    fn tile_objects(&self) -> Vec<LevelObject> {
        let mut objects = Vec::with_capacity(self.floor.len());
        for row in 0..self.height {
            for col in 0..self.width {
                let tile = TileCoord::new(col, row);
                let kind = if self.index(tile).is_some_and(|index| self.floor[index]) {
                    ObjectKind::Floor
                } else {
                    ObjectKind::Wall
                };
                objects.push(LevelObject::at_tile(kind, tile));
            }
        }
        objects
    }
}

//! Static level files
//!
//! One entry per line in `col,row=type` form (`:` also works as separator).
//! Lines starting with `#` or `!` are comments. Type codes:
//!
//! | Code | Kind         |
//! |------|--------------|
//! | 0    | Wall         |
//! | 1    | Entry        |
//! | 2    | Exit         |
//! | 3    | Trap         |
//! | 4    | EnemySpawn   |
//! | 5    | Key          |
//!
//! When a tile is listed twice the later entry wins. Coordinates must lie in
//! `0..MAX_GRID_TILES`; anything else is skipped.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rustc_hash::FxHashMap;

use super::object::{LevelObject, ObjectKind};
use crate::ai::MAX_GRID_TILES;
use crate::core::TileCoord;

/// Errors that can occur while loading a level file
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("level {} contains no objects", .0.display())]
    Empty(PathBuf),
}

/// Object kind for a level file type code
#[must_use]
pub fn kind_for_code(code: u32) -> Option<ObjectKind> {
    match code {
        0 => Some(ObjectKind::Wall),
        1 => Some(ObjectKind::Entry),
        2 => Some(ObjectKind::Exit),
        3 => Some(ObjectKind::Trap),
        4 => Some(ObjectKind::EnemySpawn),
        5 => Some(ObjectKind::Key),
        _ => None,
    }
}

/// Parse level text, skipping lines that cannot be understood
#[must_use]
pub fn parse_level(source: &str) -> Vec<LevelObject> {
    let mut objects: Vec<LevelObject> = Vec::new();
    let mut by_tile: FxHashMap<TileCoord, usize> = FxHashMap::default();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some((tile, code)) = parse_entry(line) else {
            warn!("skipping malformed level line {}: {line:?}", index + 1);
            continue;
        };
        if !in_level_bounds(tile) {
            warn!("skipping out-of-range tile {},{} on line {}", tile.col, tile.row, index + 1);
            continue;
        }
        let Some(kind) = kind_for_code(code) else {
            warn!("skipping unknown object type {code} on line {}", index + 1);
            continue;
        };

        let object = LevelObject::at_tile(kind, tile);
        match by_tile.get(&tile) {
            Some(&slot) => objects[slot] = object,
            None => {
                by_tile.insert(tile, objects.len());
                objects.push(object);
            }
        }
    }

    objects
}

/// Read and parse a level file
///
/// # Errors
///
/// Returns an error if the file cannot be read or yields no objects
pub fn load_level(path: impl AsRef<Path>) -> Result<Vec<LevelObject>, LevelError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let objects = parse_level(&source);
    if objects.is_empty() {
        return Err(LevelError::Empty(path.to_path_buf()));
    }
    debug!("loaded {} objects from {}", objects.len(), path.display());
    Ok(objects)
}

fn in_level_bounds(tile: TileCoord) -> bool {
    let limit = MAX_GRID_TILES as i32;
    (0..limit).contains(&tile.col) && (0..limit).contains(&tile.row)
}

fn parse_entry(line: &str) -> Option<(TileCoord, u32)> {
    let (key, value) = line.split_once(['=', ':'])?;
    let (col, row) = key.split_once(',')?;
    let tile = TileCoord::new(col.trim().parse().ok()?, row.trim().parse().ok()?);
    Some((tile, value.trim().parse().ok()?))
}

//! Level content: placed objects, static level files and spawn extraction

mod loader;
mod object;
mod spawn;

pub use loader::{LevelError, kind_for_code, load_level, parse_level};
pub use object::{ContactEffect, LevelObject, ObjectKind, Placed};
pub use spawn::{LevelSpawns, objective_target};

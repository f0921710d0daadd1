//! Headless maze simulation
//!
//! Builds a level (generated, or loaded from a level file), spawns its enemies
//! and ghosts, and runs them against a player standing on the entry tile.
//!
//! ```text
//! maze-sim [--config FILE] [--level FILE] [--seed N] [--difficulty N] [--frames N]
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use maze_core::level::{LevelSpawns, load_level};
use maze_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FRAME_TIME: f32 = 1.0 / 60.0;

/// Headless maze simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// RON or JSON config file; defaults sized for the difficulty when absent
    #[arg(long)]
    config: Option<PathBuf>,
    /// Static level file to load instead of generating a dungeon
    #[arg(long)]
    level: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    difficulty: u32,
    /// Frames to simulate at 60 Hz
    #[arg(long, default_value_t = 600)]
    frames: u32,
}

/// A player that stands still and soaks up hits
#[derive(Debug)]
struct Player {
    center: Vec2,
    damage_taken: i32,
}

impl Target for Player {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(4.0))
    }

    fn apply_damage(&mut self, amount: i32) {
        self.damage_taken += amount;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let options = Options::parse();
    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config {
            generator: GeneratorConfig::for_difficulty(options.difficulty),
            ..Config::default()
        },
    };
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);

    let (spawns, grid) = match &options.level {
        Some(path) => {
            let spawns = LevelSpawns::from_objects(load_level(path)?);
            let grid = spawns.grid();
            (spawns, grid)
        }
        None => {
            let dungeon = DungeonGenerator::new(config.generator.clone()).generate(options.difficulty, &mut rng);
            log::info!(
                "Generated {}x{} dungeon with {} rooms (seed {})",
                dungeon.width,
                dungeon.height,
                dungeon.rooms.len(),
                options.seed
            );
            (dungeon.spawns(), dungeon.grid())
        }
    };

    let (mut enemies, mut ghosts) = spawns.spawn_agents(&config.agent, &config.ghost);
    log::info!(
        "Spawned {} enemies and {} ghosts, player at {}",
        enemies.len(),
        ghosts.len(),
        spawns.player_start
    );

    let mut player = Player {
        center: spawns.player_start,
        damage_taken: 0,
    };
    let mut events = EventQueue::new();
    let mut state_changes = 0_usize;
    let mut hits = 0_usize;

    for _ in 0..options.frames {
        for enemy in enemies.iter_mut().filter(|enemy| !enemy.controller().is_dead()) {
            let mut ctx = AgentContext {
                dt: FRAME_TIME,
                grid: &grid,
                target: &mut player,
                rng: &mut rng,
                events: &mut events,
            };
            enemy.update(&mut ctx, &config.movement);
        }
        for ghost in &mut ghosts {
            let mut ctx = AgentContext {
                dt: FRAME_TIME,
                grid: &grid,
                target: &mut player,
                rng: &mut rng,
                events: &mut events,
            };
            ghost.update(&mut ctx);
        }

        events.swap();
        for event in events.drain() {
            match event {
                AgentEvent::StateChanged { agent, from, to } => {
                    log::debug!("agent {} {from} -> {to}", agent.0);
                    state_changes += 1;
                }
                AgentEvent::TargetHit { .. } => hits += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Ran {} frames: {} state changes, {} hits, player took {} damage",
        options.frames,
        state_changes,
        hits,
        player.damage_taken
    );
    Ok(())
}

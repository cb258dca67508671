//! Procedural cave generation split into coherent submodules.
//!
//! A dungeon is built in strict phases: random noise, cellular-automata smoothing,
//! room carving, spawn clearing, then connectivity repair. The result is a single
//! 4-connected floor region that includes the spawn tile.

pub mod progression;

mod automata;
mod connectivity;
mod generator;
mod grid;
mod layout;
mod model;
mod seed;
mod spawns;
mod tiles;

pub use automata::{random_grid, smooth, smooth_iterations};
pub use connectivity::{
    VisitedSet, carve_line, ensure_connectivity, flood_fill, flood_fill_into, is_fully_connected,
};
pub use generator::MapGenerator;
pub use grid::{Grid, GridError};
pub use layout::{RoomRect, RoomSpec, carve_room, carve_rooms, clear_spawn_area};
pub use model::{EnemySpawn, GeneratedDungeon};
pub use seed::{derive_level_seed, runtime_seed, seeded_rng};
pub use spawns::{
    DEFAULT_ENEMY_MIN_DISTANCE, DEFAULT_SPAWN_ATTEMPTS, SpawnQuery, find_safe_position,
    find_safe_tile, generate_enemy_spawns, pick_spawn_positions,
};
pub use tiles::{Decoration, PlacedTile, TilePlacement, build_tile_plan};

pub fn generate_dungeon(seed: u64) -> GeneratedDungeon {
    MapGenerator::default().generate(Some(seed))
}

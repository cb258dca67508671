//! Grid-construction pipeline: noise, smoothing, rooms, spawn clearing, repair.

use log::debug;
use rand_chacha::ChaCha8Rng;

use crate::config::GeneratorConfig;
use crate::types::Pos;

use super::super::automata::{fill_random, smooth_iterations};
use super::super::connectivity::ensure_connectivity;
use super::super::grid::Grid;
use super::super::layout::{carve_rooms, clear_spawn_area};

pub(super) fn build_grid(config: &GeneratorConfig, spawn_tile: Pos, rng: &mut ChaCha8Rng) -> Grid {
    let noise = fill_random(config.width, config.height, config.wall_probability, rng);
    let mut grid = smooth_iterations(noise, config.smoothing_iterations);
    debug!("smoothed caves hold {} floor cells", grid.floor_count());

    let rooms = carve_rooms(&mut grid, rng, config.room_spec());
    clear_spawn_area(&mut grid, spawn_tile, config.spawn_clear_radius);
    debug!("carved {} rooms, {} floor cells before repair", rooms.len(), grid.floor_count());

    ensure_connectivity(&mut grid, spawn_tile);
    grid
}

//! Random noise seeding and cellular-automata smoothing.

use rand_chacha::ChaCha8Rng;

use crate::types::{Pos, TileKind};

use super::grid::Grid;
use super::seed::{random_unit, runtime_seed, seeded_rng};

/// A wall stays a wall with at least this many walls around it.
const WALL_SURVIVAL_THRESHOLD: usize = 4;
/// A floor turns into wall with at least this many walls around it.
const FLOOR_COLLAPSE_THRESHOLD: usize = 5;

/// Noise grid: each interior cell is a wall with probability `wall_probability`,
/// the border is always wall. `None` draws a fresh seed.
pub fn random_grid(width: usize, height: usize, wall_probability: f64, seed: Option<u64>) -> Grid {
    let mut rng = seeded_rng(seed.unwrap_or_else(runtime_seed));
    fill_random(width, height, wall_probability, &mut rng)
}

pub(super) fn fill_random(
    width: usize,
    height: usize,
    wall_probability: f64,
    rng: &mut ChaCha8Rng,
) -> Grid {
    let mut grid = Grid::filled(width, height, TileKind::Wall);
    for pos in grid.interior_positions().collect::<Vec<_>>() {
        let tile =
            if random_unit(rng) < wall_probability { TileKind::Wall } else { TileKind::Floor };
        grid.set(pos, tile);
    }
    grid
}

/// One smoothing pass. Pure: the input is left untouched.
pub fn smooth(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    for pos in grid.positions() {
        let walls = neighbour_wall_count(grid, pos);
        let tile = match grid.tile_at(pos) {
            TileKind::Wall if walls >= WALL_SURVIVAL_THRESHOLD => TileKind::Wall,
            TileKind::Floor if walls >= FLOOR_COLLAPSE_THRESHOLD => TileKind::Wall,
            _ => TileKind::Floor,
        };
        next.set(pos, tile);
    }
    next.enforce_border();
    next
}

pub fn smooth_iterations(grid: Grid, iterations: usize) -> Grid {
    (0..iterations).fold(grid, |current, _| smooth(&current))
}

/// Walls among the eight neighbours; cells off the grid count as walls.
fn neighbour_wall_count(grid: &Grid, pos: Pos) -> usize {
    let mut walls = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let neighbour = Pos { y: pos.y + dy, x: pos.x + dx };
            if grid.tile_at(neighbour) == TileKind::Wall {
                walls += 1;
            }
        }
    }
    walls
}

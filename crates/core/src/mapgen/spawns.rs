//! Placement queries for the player and for enemies on a finished grid.

use log::{debug, warn};
use rand_chacha::ChaCha8Rng;

use crate::types::{EnemyKind, PixelPos, Pos, to_pixel_center};

use super::grid::Grid;
use super::model::EnemySpawn;
use super::seed::{coin_flip, random_usize};

pub const DEFAULT_SPAWN_ATTEMPTS: usize = 100;
pub const DEFAULT_ENEMY_MIN_DISTANCE: f64 = 5.0;

/// Top-left corner of cell `(2, 2)`, used when no floor can be found at all.
fn fallback_pixel(tile_size: u32) -> PixelPos {
    let edge = (tile_size * 2) as f32;
    PixelPos { x: edge, y: edge }
}

/// Nearest interior floor cell to `preferred`, searching square rings of growing
/// Chebyshev radius. Within a ring cells are visited row by row.
pub fn find_safe_tile(grid: &Grid, preferred: Pos) -> Option<Pos> {
    if grid.is_interior(preferred) && grid.is_floor(preferred) {
        return Some(preferred);
    }

    let max_distance = grid.width().max(grid.height()) as i32;
    for distance in 1..max_distance {
        for offset_y in -distance..=distance {
            for offset_x in -distance..=distance {
                if offset_x.abs() != distance && offset_y.abs() != distance {
                    continue;
                }
                let pos = Pos { y: preferred.y + offset_y, x: preferred.x + offset_x };
                if grid.is_interior(pos) && grid.is_floor(pos) {
                    return Some(pos);
                }
            }
        }
    }
    None
}

/// Pixel center of [`find_safe_tile`], or a fixed corner point when the grid has
/// no reachable floor at all.
pub fn find_safe_position(grid: &Grid, preferred: Pos, tile_size: u32) -> PixelPos {
    match find_safe_tile(grid, preferred) {
        Some(pos) => to_pixel_center(pos, tile_size),
        None => {
            warn!(
                "no floor near {preferred:?} on a {}x{} grid, using fallback position",
                grid.width(),
                grid.height()
            );
            fallback_pixel(tile_size)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnQuery {
    pub count: usize,
    pub reference: Pos,
    pub min_distance: f64,
    pub attempts: usize,
}

impl SpawnQuery {
    pub fn new(count: usize, reference: Pos) -> Self {
        Self {
            count,
            reference,
            min_distance: DEFAULT_ENEMY_MIN_DISTANCE,
            attempts: DEFAULT_SPAWN_ATTEMPTS,
        }
    }
}

/// Samples up to `query.count` distinct interior floor cells strictly farther than
/// `query.min_distance` from the reference. A slot that finds no candidate within
/// its attempt budget is dropped, so fewer positions may come back.
pub fn pick_spawn_positions(grid: &Grid, rng: &mut ChaCha8Rng, query: SpawnQuery) -> Vec<Pos> {
    if grid.width() < 3 || grid.height() < 3 {
        return Vec::new();
    }
    let eligible = grid
        .interior_positions()
        .filter(|&pos| grid.is_floor(pos) && pos.distance(query.reference) > query.min_distance)
        .count();
    let mut chosen: Vec<Pos> = Vec::with_capacity(query.count.min(eligible));

    for _ in 0..query.count {
        if chosen.len() == eligible {
            break;
        }
        for _ in 0..query.attempts {
            let candidate = Pos {
                y: random_usize(rng, 1, grid.height() - 2) as i32,
                x: random_usize(rng, 1, grid.width() - 2) as i32,
            };
            if grid.is_floor(candidate)
                && candidate.distance(query.reference) > query.min_distance
                && !chosen.contains(&candidate)
            {
                chosen.push(candidate);
                break;
            }
        }
    }

    if chosen.len() < query.count {
        debug!("placed {} of {} requested spawns", chosen.len(), query.count);
    }
    chosen
}

/// Places a roster of enemies, each a crab or an octopus with equal odds.
pub fn generate_enemy_spawns(
    grid: &Grid,
    rng: &mut ChaCha8Rng,
    query: SpawnQuery,
) -> Vec<EnemySpawn> {
    pick_spawn_positions(grid, rng, query)
        .into_iter()
        .map(|pos| {
            let kind = if coin_flip(rng) { EnemyKind::Crab } else { EnemyKind::Octopus };
            EnemySpawn { kind, pos }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::mapgen::seed::seeded_rng;
    use crate::types::TileKind;

    #[test]
    fn preferred_floor_cell_is_returned_as_is() {
        let grid = Grid::open(9, 9);
        assert_eq!(find_safe_tile(&grid, Pos::new(4, 4)), Some(Pos::new(4, 4)));
    }

    #[test]
    fn ring_search_prefers_lowest_row_then_column() {
        let mut grid = Grid::filled(9, 9, TileKind::Wall);
        grid.set(Pos::new(5, 5), TileKind::Floor);
        grid.set(Pos::new(3, 4), TileKind::Floor);
        grid.set(Pos::new(6, 2), TileKind::Floor);

        // Ring 1 covers rows 3..=5; (3, 4) is met before (5, 5).
        assert_eq!(find_safe_tile(&grid, Pos::new(4, 4)), Some(Pos::new(3, 4)));
    }

    #[test]
    fn ring_search_never_returns_border_cells() {
        let mut grid = Grid::filled(7, 7, TileKind::Floor);
        for pos in grid.interior_positions().collect::<Vec<_>>() {
            grid.set(pos, TileKind::Wall);
        }
        grid.set(Pos::new(5, 5), TileKind::Floor);

        assert_eq!(find_safe_tile(&grid, Pos::new(1, 1)), Some(Pos::new(5, 5)));
    }

    #[test]
    fn solid_grid_falls_back_to_fixed_corner() {
        let grid = Grid::filled(8, 8, TileKind::Wall);
        assert_eq!(find_safe_tile(&grid, Pos::new(4, 4)), None);
        assert_eq!(find_safe_position(&grid, Pos::new(4, 4), 32), PixelPos { x: 64.0, y: 64.0 });
    }

    #[test]
    fn spawn_positions_are_unique_distant_floor_cells() {
        let grid = Grid::open(20, 20);
        let reference = Pos::new(10, 10);
        let mut rng = seeded_rng(42);

        let positions = pick_spawn_positions(&grid, &mut rng, SpawnQuery::new(8, reference));

        assert_eq!(positions.len(), 8);
        let unique: BTreeSet<_> = positions.iter().copied().collect();
        assert_eq!(unique.len(), positions.len());
        for pos in positions {
            assert!(grid.is_floor(pos));
            assert!(pos.distance(reference) > 5.0);
        }
    }

    #[test]
    fn impossible_constraints_yield_no_positions() {
        let grid = Grid::open(9, 9);
        let mut rng = seeded_rng(3);
        let query = SpawnQuery { min_distance: 50.0, ..SpawnQuery::new(4, Pos::new(4, 4)) };

        assert!(pick_spawn_positions(&grid, &mut rng, query).is_empty());
    }

    #[test]
    fn enemy_roster_mixes_both_kinds() {
        let grid = Grid::open(40, 32);
        let mut rng = seeded_rng(11);
        let roster = generate_enemy_spawns(&grid, &mut rng, SpawnQuery::new(30, Pos::new(20, 16)));

        let kinds: BTreeSet<_> = roster.iter().map(|spawn| spawn.kind).collect();
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn oversized_request_stops_once_every_candidate_is_taken() {
        let grid = Grid::open(5, 5);
        let reference = Pos::new(2, 2);
        let mut rng = seeded_rng(17);
        let query = SpawnQuery { min_distance: 0.5, attempts: 10_000, ..SpawnQuery::new(usize::MAX, reference) };

        let positions = pick_spawn_positions(&grid, &mut rng, query);

        assert_eq!(positions.len(), 8);
        assert!(!positions.contains(&reference));
    }
}

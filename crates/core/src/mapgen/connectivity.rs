//! Reachability analysis and repair: every floor cell ends up reachable from the spawn.
//!
//! The repair walks the interior in row-major order. Each floor cell not yet reached
//! is joined to the closest reached floor cell by a straight carved corridor, and the
//! region behind it is absorbed into the reached set before the scan continues. Regions
//! therefore merge as the scan proceeds, and later pockets may attach to earlier ones.

use log::debug;

use crate::types::{Pos, TileKind};

use super::grid::Grid;

const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Cells reached by a flood fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitedSet {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    count: usize,
}

impl VisitedSet {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![false; width * height], count: 0 }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|index| self.cells[index])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Marks `pos`, returning `false` when it was already marked or lies off the grid.
    fn insert(&mut self, pos: Pos) -> bool {
        let Some(index) = self.index(pos) else {
            return false;
        };
        if self.cells[index] {
            return false;
        }
        self.cells[index] = true;
        self.count += 1;
        true
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        Some((pos.y as usize) * self.width + (pos.x as usize))
    }
}

/// Floor cells 4-connected to `start`. Empty when `start` is not floor.
pub fn flood_fill(grid: &Grid, start: Pos) -> VisitedSet {
    let mut visited = VisitedSet::new(grid.width(), grid.height());
    flood_fill_into(grid, &mut visited, start);
    visited
}

/// Extends `visited` with everything reachable from `start` that is not marked yet.
/// Returns how many cells were added.
pub fn flood_fill_into(grid: &Grid, visited: &mut VisitedSet, start: Pos) -> usize {
    if !grid.is_floor(start) || !visited.insert(start) {
        return 0;
    }

    let mut added = 1;
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let next = Pos { y: pos.y + dy, x: pos.x + dx };
            if grid.is_floor(next) && visited.insert(next) {
                added += 1;
                stack.push(next);
            }
        }
    }
    added
}

/// True when a flood fill from `start` reaches every floor cell of the grid.
pub fn is_fully_connected(grid: &Grid, start: Pos) -> bool {
    flood_fill(grid, start).len() == grid.floor_count()
}

/// Carves corridors until every floor cell is reachable from `start`.
/// Never turns floor into wall. Returns the number of corridors carved.
pub fn ensure_connectivity(grid: &mut Grid, start: Pos) -> usize {
    let mut visited = flood_fill(grid, start);
    let mut corridors = 0;

    for pos in grid.interior_positions().collect::<Vec<_>>() {
        if !grid.is_floor(pos) || visited.contains(pos) {
            continue;
        }
        let Some(target) = nearest_visited_floor(grid, &visited, pos) else {
            continue;
        };

        carve_line(grid, pos, target);
        let absorbed = flood_fill_into(grid, &mut visited, pos);
        corridors += 1;
        debug!("joined pocket at {pos:?} to {target:?}, absorbing {absorbed} cells");
    }

    if corridors > 0 {
        debug!("connectivity repair carved {corridors} corridors");
    }
    corridors
}

/// Closest reached interior floor cell by Euclidean distance. Ties keep the first
/// cell in row-major order.
fn nearest_visited_floor(grid: &Grid, visited: &VisitedSet, from: Pos) -> Option<Pos> {
    let mut best = None;
    let mut best_distance = u64::MAX;
    for pos in grid.interior_positions() {
        if !grid.is_floor(pos) || !visited.contains(pos) {
            continue;
        }
        let distance = from.distance_squared(pos);
        if distance < best_distance {
            best = Some(pos);
            best_distance = distance;
        }
    }
    best
}

/// Bresenham line from `from` to `to`, both ends included, every cell set to floor.
/// Diagonal steps also carve the corner cell, so consecutive cells share an edge.
pub fn carve_line(grid: &mut Grid, from: Pos, to: Pos) {
    for pos in line_cells(from, to) {
        grid.set(pos, TileKind::Floor);
    }
}

fn line_cells(from: Pos, to: Pos) -> Vec<Pos> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let step_x = if from.x < to.x { 1 } else { -1 };
    let step_y = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;

    let mut cells = Vec::with_capacity((dx + dy + 1) as usize);
    let mut current = from;
    cells.push(current);
    while current != to {
        let doubled = 2 * err;
        let mut stepped_x = false;
        if doubled > -dy {
            err -= dy;
            current.x += step_x;
            stepped_x = true;
        }
        if doubled < dx {
            // Diagonal step: keep the corner so the corridor stays 4-connected.
            if stepped_x {
                cells.push(current);
            }
            err += dx;
            current.y += step_y;
        }
        cells.push(current);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_fill_uses_four_way_adjacency() {
        let grid = Grid::from_rows(&[
            "#####", //
            "#.#.#",
            "##.##",
            "#...#",
            "#####",
        ])
        .unwrap();

        let visited = flood_fill(&grid, Pos::new(2, 3));
        assert_eq!(visited.len(), 4);
        assert!(visited.contains(Pos::new(2, 2)));
        assert!(!visited.contains(Pos::new(1, 1)));
        assert!(!visited.contains(Pos::new(3, 1)));
    }

    #[test]
    fn flood_fill_from_a_wall_reaches_nothing() {
        let grid = Grid::open(5, 5);
        assert!(flood_fill(&grid, Pos::new(0, 0)).is_empty());
    }

    #[test]
    fn flood_fill_handles_large_serpentine_maps() {
        let width = 121;
        let height = 121;
        let mut grid = Grid::open(width, height);
        for y in (2..height - 1).step_by(2) {
            let gap = if (y / 2) % 2 == 0 { 1 } else { width - 2 };
            for x in 1..width - 1 {
                if x != gap {
                    grid.set(Pos::new(x as i32, y as i32), TileKind::Wall);
                }
            }
        }

        assert!(is_fully_connected(&grid, Pos::new(1, 1)));
    }

    #[test]
    fn line_cells_include_both_endpoints_and_share_edges() {
        for (from, to) in [
            (Pos::new(1, 1), Pos::new(6, 3)),
            (Pos::new(6, 3), Pos::new(1, 1)),
            (Pos::new(2, 7), Pos::new(4, 1)),
            (Pos::new(1, 1), Pos::new(4, 4)),
        ] {
            let cells = line_cells(from, to);
            assert_eq!(cells.first(), Some(&from));
            assert_eq!(cells.last(), Some(&to));
            for pair in cells.windows(2) {
                let step = pair[0].x.abs_diff(pair[1].x) + pair[0].y.abs_diff(pair[1].y);
                assert_eq!(step, 1, "{from:?} -> {to:?}: {cells:?}");
            }
        }
        assert_eq!(line_cells(Pos::new(2, 2), Pos::new(2, 2)), vec![Pos::new(2, 2)]);
    }

    #[test]
    fn diagonal_corridor_joins_diagonal_neighbours() {
        let mut grid = Grid::from_rows(&[
            "#####", //
            "#.###",
            "##.##",
            "#####",
        ])
        .unwrap();

        assert_eq!(ensure_connectivity(&mut grid, Pos::new(2, 2)), 1);
        assert!(is_fully_connected(&grid, Pos::new(2, 2)));
        assert_eq!(grid.floor_count(), 3);
    }

    #[test]
    fn repair_joins_a_sealed_pocket() {
        let mut grid = Grid::from_rows(&[
            "#########", //
            "#...#####",
            "#...#####",
            "#...###.#",
            "#########",
        ])
        .unwrap();
        let spawn = Pos::new(2, 2);
        assert!(!is_fully_connected(&grid, spawn));

        let corridors = ensure_connectivity(&mut grid, spawn);

        assert_eq!(corridors, 1);
        assert!(is_fully_connected(&grid, spawn));
        assert!(grid.is_floor(Pos::new(7, 3)));
    }

    #[test]
    fn nearest_target_tie_breaks_in_row_major_order() {
        let grid = Grid::from_rows(&[
            "#######", //
            "#.###.#",
            "###.###",
            "#.###.#",
            "#######",
        ])
        .unwrap();
        let mut visited = VisitedSet::new(grid.width(), grid.height());
        for pos in [Pos::new(1, 1), Pos::new(5, 1), Pos::new(1, 3), Pos::new(5, 3)] {
            visited.insert(pos);
        }

        assert_eq!(nearest_visited_floor(&grid, &visited, Pos::new(3, 2)), Some(Pos::new(1, 1)));
    }

    #[test]
    fn repair_without_a_reachable_start_changes_nothing() {
        let mut grid = Grid::from_rows(&[
            "######", //
            "#.##.#",
            "######",
        ])
        .unwrap();
        let before = grid.clone();

        assert_eq!(ensure_connectivity(&mut grid, Pos::new(2, 1)), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn repair_on_connected_grid_is_a_no_op() {
        let mut grid = Grid::open(9, 7);
        let before = grid.clone();
        assert_eq!(ensure_connectivity(&mut grid, Pos::new(4, 3)), 0);
        assert_eq!(grid, before);
    }
}

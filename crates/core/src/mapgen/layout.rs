//! Room carving and spawn-area clearing on top of the smoothed caves.

use log::debug;
use rand_chacha::ChaCha8Rng;

use crate::types::{Pos, TileKind};

use super::grid::Grid;
use super::seed::random_usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl RoomRect {
    fn right(self) -> usize {
        self.x + self.width - 1
    }

    fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom()).flat_map(move |y| {
            (self.x..=self.right()).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomSpec {
    pub count: usize,
    pub min_size: usize,
    pub max_size: usize,
}

impl Default for RoomSpec {
    fn default() -> Self {
        Self { count: 5, min_size: 5, max_size: 10 }
    }
}

/// Picks a random room that keeps a one-cell margin from the border, or `None`
/// when even the smallest room would not fit.
pub(super) fn roll_room(
    rng: &mut ChaCha8Rng,
    grid_width: usize,
    grid_height: usize,
    spec: RoomSpec,
) -> Option<RoomRect> {
    let max_width = spec.max_size.min(grid_width.checked_sub(2)?);
    let max_height = spec.max_size.min(grid_height.checked_sub(2)?);
    if spec.min_size == 0 || spec.min_size > max_width || spec.min_size > max_height {
        return None;
    }

    let width = random_usize(rng, spec.min_size, max_width);
    let height = random_usize(rng, spec.min_size, max_height);
    let x = random_usize(rng, 1, grid_width - width - 1);
    let y = random_usize(rng, 1, grid_height - height - 1);
    Some(RoomRect { x, y, width, height })
}

/// Carves `spec.count` random rooms. Overlaps are fine; carving is a union.
pub fn carve_rooms(grid: &mut Grid, rng: &mut ChaCha8Rng, spec: RoomSpec) -> Vec<RoomRect> {
    let mut rooms = Vec::new();
    for _ in 0..spec.count {
        let Some(room) = roll_room(rng, grid.width(), grid.height(), spec) else {
            debug!("room spec {spec:?} does not fit a {}x{} grid", grid.width(), grid.height());
            break;
        };
        carve_room(grid, room);
        rooms.push(room);
    }
    rooms
}

pub fn carve_room(grid: &mut Grid, room: RoomRect) {
    for pos in room.cells() {
        grid.set(pos, TileKind::Floor);
    }
}

/// Forces every cell within Chebyshev `radius` of `center` to floor, clipped to
/// the grid interior so the border ring is never opened.
pub fn clear_spawn_area(grid: &mut Grid, center: Pos, radius: u32) {
    if grid.width() < 3 || grid.height() < 3 {
        return;
    }
    let Some((left, right)) = clip_span(center.x, radius, grid.width()) else {
        return;
    };
    let Some((top, bottom)) = clip_span(center.y, radius, grid.height()) else {
        return;
    };
    for y in top..=bottom {
        for x in left..=right {
            grid.set(Pos { y, x }, TileKind::Floor);
        }
    }
}

/// `[center - radius, center + radius]` intersected with the interior `[1, len - 2]`.
fn clip_span(center: i32, radius: u32, len: usize) -> Option<(i32, i32)> {
    let radius = i64::from(radius);
    let low = (i64::from(center) - radius).max(1);
    let high = (i64::from(center) + radius).min(len as i64 - 2);
    if low > high {
        return None;
    }
    Some((i32::try_from(low).ok()?, i32::try_from(high).ok()?))
}

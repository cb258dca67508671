//! Grid and tile-space primitives shared by every generation phase and query.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Pos, TileKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {pos:?} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: usize, height: usize },
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has length {found}, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },
    #[error("row {row} contains unknown glyph {glyph:?}")]
    InvalidRow { row: usize, glyph: char },
    #[error("{width}x{height} grid needs {expected} tiles, found {found}")]
    SizeMismatch { width: usize, height: usize, expected: usize, found: usize },
}

/// Rectangular map of cells stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let RawGrid { width, height, tiles } = raw;
        let expected = width.checked_mul(height).unwrap_or(usize::MAX);
        if expected == 0 {
            return Err(GridError::Empty);
        }
        if tiles.len() != expected {
            return Err(GridError::SizeMismatch { width, height, expected, found: tiles.len() });
        }
        Ok(Self { width, height, tiles })
    }
}

impl Grid {
    pub fn filled(width: usize, height: usize, tile: TileKind) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    /// All-floor interior surrounded by a one-cell wall border.
    pub fn open(width: usize, height: usize) -> Self {
        let mut grid = Self::filled(width, height, TileKind::Floor);
        grid.enforce_border();
        grid
    }

    /// Parses rows of `#` (wall) and `.` (floor).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRows { row, expected: width, found });
            }
            for glyph in line.chars() {
                let tile = TileKind::from_glyph(glyph).ok_or(GridError::InvalidRow { row, glyph })?;
                tiles.push(tile);
            }
        }

        Ok(Self { width, height: rows.len(), tiles })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.x == 0
            || pos.y == 0
            || pos.x as usize == self.width - 1
            || pos.y as usize == self.height - 1
    }

    /// True for in-bounds cells that are not on the border ring.
    pub fn is_interior(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_border(pos)
    }

    pub fn cell_at(&self, pos: Pos) -> Result<TileKind, GridError> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds { pos, width: self.width, height: self.height });
        }
        Ok(self.tiles[self.index(pos)])
    }

    /// Like [`Grid::cell_at`], but anything outside the grid reads as wall.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_floor()
    }

    /// Writes `tile` at `pos`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Pos, tile: TileKind) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.tiles[index] = tile;
        }
    }

    pub fn enforce_border(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                if self.is_border(pos) {
                    self.tiles[y * self.width + x] = TileKind::Wall;
                }
            }
        }
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_floor()).count()
    }

    /// Every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    /// Interior cell positions (border excluded) in row-major order.
    pub fn interior_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let inner_width = self.width.saturating_sub(1);
        let inner_height = self.height.saturating_sub(1);
        (1..inner_height)
            .flat_map(move |y| (1..inner_width).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Wall => 0,
                TileKind::Floor => 1,
            });
        }
        bytes
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|tile| tile.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

//! Public data models for generated dungeons and enemy spawns.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{EnemyKind, PixelPos, Pos, TileKind, to_pixel_center};

use super::grid::{Grid, GridError};
use super::spawns::find_safe_position;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Pos,
}

/// A finished map: every floor cell is reachable from `spawn_tile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDungeon {
    pub seed: u64,
    pub grid: Grid,
    pub spawn_tile: Pos,
    pub tile_size: u32,
}

impl GeneratedDungeon {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn cell_at(&self, pos: Pos) -> Result<TileKind, GridError> {
        self.grid.cell_at(pos)
    }

    pub fn to_pixel_center(&self, pos: Pos) -> PixelPos {
        to_pixel_center(pos, self.tile_size)
    }

    pub fn player_start(&self) -> PixelPos {
        find_safe_position(&self.grid, self.spawn_tile, self.tile_size)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.grid.canonical_bytes();
        bytes.extend(self.spawn_tile.y.to_le_bytes());
        bytes.extend(self.spawn_tile.x.to_le_bytes());
        bytes.extend(self.tile_size.to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

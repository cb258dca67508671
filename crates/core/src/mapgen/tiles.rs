//! Renderer-facing tile plan: what to place at each cell, in pixel space.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::types::{PixelPos, Pos, TileKind};

use super::grid::Grid;
use super::model::GeneratedDungeon;
use super::seed::{random_unit, random_usize};

/// Cumulative upper bounds for each decorative floor variant, in variant order.
const FLOOR_VARIANT_THRESHOLDS: [f64; 12] =
    [0.50, 0.60, 0.70, 0.75, 0.80, 0.85, 0.90, 0.92, 0.94, 0.96, 0.98, 1.00];

/// Share of floor cells that carry a decoration sprite.
const FLOOR_DECORATION_CHANCE: f64 = 0.05;

const DECORATIONS: [Decoration; 6] = [
    Decoration::Torch,
    Decoration::Barrel,
    Decoration::Chest,
    Decoration::Bones,
    Decoration::Blood,
    Decoration::Slime,
];

/// Cosmetic sprite drawn above a floor tile and below walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Decoration {
    Torch,
    Barrel,
    Chest,
    Bones,
    Blood,
    Slime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacedTile {
    /// Opaque and collidable. Destructible walls may be broken by attacks.
    Wall { destructible: bool },
    /// Walkable, with a purely decorative variant index and optional decoration.
    Floor { variant: u8, decoration: Option<Decoration> },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub pos: Pos,
    pub center: PixelPos,
    pub tile: PlacedTile,
}

/// One placement per cell, row-major. The dungeon is not modified.
pub fn build_tile_plan(dungeon: &GeneratedDungeon, rng: &mut ChaCha8Rng) -> Vec<TilePlacement> {
    dungeon
        .grid
        .positions()
        .map(|pos| {
            let tile = match dungeon.grid.tile_at(pos) {
                TileKind::Wall => PlacedTile::Wall { destructible: is_destructible(&dungeon.grid, pos) },
                TileKind::Floor => PlacedTile::Floor {
                    variant: floor_variant(random_unit(rng)),
                    decoration: roll_decoration(rng),
                },
            };
            TilePlacement { pos, center: dungeon.to_pixel_center(pos), tile }
        })
        .collect()
}

/// Walls in the two outermost rings hold the level together and never break.
fn is_destructible(grid: &Grid, pos: Pos) -> bool {
    pos.x > 1
        && pos.y > 1
        && (pos.x as usize) < grid.width().saturating_sub(2)
        && (pos.y as usize) < grid.height().saturating_sub(2)
}

fn roll_decoration(rng: &mut ChaCha8Rng) -> Option<Decoration> {
    if random_unit(rng) >= FLOOR_DECORATION_CHANCE {
        return None;
    }
    Some(DECORATIONS[random_usize(rng, 0, DECORATIONS.len() - 1)])
}

fn floor_variant(roll: f64) -> u8 {
    FLOOR_VARIANT_THRESHOLDS
        .iter()
        .position(|&threshold| roll < threshold)
        .unwrap_or(FLOOR_VARIANT_THRESHOLDS.len() - 1) as u8
}

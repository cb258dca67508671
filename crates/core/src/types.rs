use serde::{Deserialize, Serialize};

/// A cell coordinate. Column `x`, row `y`, both zero-based from the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn distance_squared(self, other: Pos) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Pos) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

/// A point in display space, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
}

impl TileKind {
    pub fn is_floor(self) -> bool {
        self == TileKind::Floor
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Floor),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Crab,
    Octopus,
}

/// Converts a cell coordinate to the pixel center of that cell.
pub fn to_pixel_center(pos: Pos, tile_size: u32) -> PixelPos {
    let tile = tile_size as f32;
    PixelPos { x: pos.x as f32 * tile + tile / 2.0, y: pos.y as f32 * tile + tile / 2.0 }
}

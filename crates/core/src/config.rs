//! Generator tuning, loadable from TOML. Every field has a default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::de::Error as TomlError;

use crate::mapgen::{RoomSpec, SpawnQuery};
use crate::types::Pos;

const MIN_DIMENSION: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] TomlError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    /// Pixels per cell edge.
    pub tile_size: u32,
    pub wall_probability: f64,
    pub smoothing_iterations: usize,
    pub room_count: usize,
    pub min_room_size: usize,
    pub max_room_size: usize,
    pub spawn_clear_radius: u32,
    pub enemy_min_distance: f64,
    /// Sampling attempts per requested enemy position.
    pub spawn_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 32,
            tile_size: 32,
            wall_probability: 0.4,
            smoothing_iterations: 6,
            room_count: 5,
            min_room_size: 5,
            max_room_size: 10,
            spawn_clear_radius: 2,
            enemy_min_distance: 5.0,
            spawn_attempts: 100,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least {MIN_DIMENSION}x{MIN_DIMENSION}, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(ConfigError::Invalid(format!(
                "wall_probability must be within [0, 1], got {}",
                self.wall_probability
            )));
        }
        if self.min_room_size == 0 || self.min_room_size > self.max_room_size {
            return Err(ConfigError::Invalid(format!(
                "room sizes must satisfy 0 < min <= max, got {}..={}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_room_size + 2 > self.width || self.max_room_size + 2 > self.height {
            return Err(ConfigError::Invalid(format!(
                "rooms up to {} cells do not fit a {}x{} grid with a wall margin",
                self.max_room_size, self.width, self.height
            )));
        }
        let interior_cells = (self.width - 2) * (self.height - 2);
        if self.room_count > interior_cells {
            return Err(ConfigError::Invalid(format!(
                "room_count must not exceed the {interior_cells} interior cells, got {}",
                self.room_count
            )));
        }
        if self.spawn_clear_radius as usize > self.width.max(self.height) {
            return Err(ConfigError::Invalid(format!(
                "spawn_clear_radius must not exceed the grid's larger side, got {}",
                self.spawn_clear_radius
            )));
        }
        if !self.enemy_min_distance.is_finite() || self.enemy_min_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "enemy_min_distance must be a non-negative number, got {}",
                self.enemy_min_distance
            )));
        }
        if self.spawn_attempts == 0 {
            return Err(ConfigError::Invalid("spawn_attempts must be positive".to_string()));
        }
        Ok(())
    }

    /// The designated player spawn: the grid center.
    pub fn spawn_tile(&self) -> Pos {
        Pos { y: (self.height / 2) as i32, x: (self.width / 2) as i32 }
    }

    pub fn room_spec(&self) -> RoomSpec {
        RoomSpec { count: self.room_count, min_size: self.min_room_size, max_size: self.max_room_size }
    }

    pub fn spawn_query(&self, count: usize, reference: Pos) -> SpawnQuery {
        SpawnQuery {
            count,
            reference,
            min_distance: self.enemy_min_distance,
            attempts: self.spawn_attempts,
        }
    }
}

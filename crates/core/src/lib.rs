pub mod config;
pub mod level;
pub mod mapgen;
pub mod types;

pub use config::{ConfigError, GeneratorConfig};
pub use level::{DungeonRun, Level};
pub use mapgen::{GeneratedDungeon, Grid, GridError, MapGenerator};
pub use types::*;

//! Level state and level-to-level transitions.
//! A `DungeonRun` owns exactly one live `Level`; advancing replaces it wholesale.

use log::info;
use serde::Serialize;

use crate::config::{ConfigError, GeneratorConfig};
use crate::mapgen::progression::{STARTING_LEVEL, enemy_spawn_count};
use crate::mapgen::{
    EnemySpawn, GeneratedDungeon, MapGenerator, derive_level_seed, generate_enemy_spawns,
    seeded_rng,
};
use crate::types::PixelPos;

const ENEMY_STREAM_SALT: u64 = 0xA24B_AED4_963E_E407;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Level {
    pub number: u32,
    pub dungeon: GeneratedDungeon,
    pub player_start: PixelPos,
    pub enemy_spawns: Vec<EnemySpawn>,
}

impl Level {
    /// Generates level `number` of the run identified by `run_seed`.
    pub fn generate(generator: &MapGenerator, run_seed: u64, number: u32) -> Self {
        let level_seed = derive_level_seed(run_seed, number);
        let dungeon = generator.generate(Some(level_seed));
        let player_start = dungeon.player_start();

        let mut rng = seeded_rng(level_seed ^ ENEMY_STREAM_SALT);
        let query = generator.config().spawn_query(enemy_spawn_count(number), dungeon.spawn_tile);
        let enemy_spawns = generate_enemy_spawns(&dungeon.grid, &mut rng, query);

        Self { number, dungeon, player_start, enemy_spawns }
    }

    pub fn enemy_pixel_positions(&self) -> Vec<PixelPos> {
        self.enemy_spawns.iter().map(|spawn| self.dungeon.to_pixel_center(spawn.pos)).collect()
    }
}

#[derive(Clone, Debug)]
pub struct DungeonRun {
    run_seed: u64,
    generator: MapGenerator,
    level: Level,
}

impl DungeonRun {
    pub fn new(run_seed: u64, config: GeneratorConfig) -> Result<Self, ConfigError> {
        let generator = MapGenerator::new(config)?;
        let level = Level::generate(&generator, run_seed, STARTING_LEVEL);
        Ok(Self { run_seed, generator, level })
    }

    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Discards the current level and generates the next one.
    pub fn advance(&mut self) -> &Level {
        let next = self.level.number + 1;
        self.level = Level::generate(&self.generator, self.run_seed, next);
        info!(
            "entered level {next} with {} enemies (dungeon {:#018x})",
            self.level.enemy_spawns.len(),
            self.level.dungeon.fingerprint()
        );
        &self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_starts_on_level_one_with_a_single_enemy_slot() {
        let run = DungeonRun::new(7, GeneratorConfig::default()).unwrap();
        assert_eq!(run.level().number, 1);
        assert!(run.level().enemy_spawns.len() <= 1);
    }

    #[test]
    fn advancing_replaces_the_level() {
        let mut run = DungeonRun::new(7, GeneratorConfig::default()).unwrap();
        let first = run.level().dungeon.fingerprint();

        let second = run.advance();
        assert_eq!(second.number, 2);
        assert_ne!(second.dungeon.fingerprint(), first);
        assert!(second.enemy_spawns.len() <= 2);
    }

    #[test]
    fn levels_are_reproducible_from_run_seed_alone() {
        let mut run = DungeonRun::new(99, GeneratorConfig::default()).unwrap();
        run.advance();
        run.advance();

        let generator = MapGenerator::default();
        assert_eq!(run.level(), &Level::generate(&generator, 99, 3));
    }

    #[test]
    fn enemy_pixels_match_their_cells() {
        let run = DungeonRun::new(3, GeneratorConfig::default()).unwrap();
        let level = run.level();
        let tile = level.dungeon.tile_size as f32;
        for (spawn, pixel) in level.enemy_spawns.iter().zip(level.enemy_pixel_positions()) {
            assert_eq!(pixel.x, spawn.pos.x as f32 * tile + tile / 2.0);
            assert_eq!(pixel.y, spawn.pos.y as f32 * tile + tile / 2.0);
        }
    }
}

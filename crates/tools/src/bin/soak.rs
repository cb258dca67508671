use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::mapgen::{find_safe_tile, flood_fill};
use dungeon_core::{DungeonRun, GeneratorConfig, TileKind};
use log::info;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of runs to generate
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    /// Levels to descend per run
    #[arg(short, long, default_value_t = 5)]
    levels: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Soaking {} runs of {} levels from seed {}...", args.runs, args.levels, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut floor_cells = 0_usize;

    for run_index in 0..args.runs {
        let run_seed = rng.next_u64();
        let mut run = DungeonRun::new(run_seed, GeneratorConfig::default())?;

        for _ in 0..args.levels {
            let level = run.level();
            let grid = &level.dungeon.grid;
            let reached = flood_fill(grid, level.dungeon.spawn_tile).len();
            if reached != grid.floor_count() {
                bail!(
                    "run {run_index} (seed {run_seed}) level {}: reached {reached} of {} floor cells",
                    level.number,
                    grid.floor_count()
                );
            }
            let open_border =
                grid.positions().any(|pos| grid.is_border(pos) && grid.tile_at(pos) != TileKind::Wall);
            if open_border {
                bail!("run {run_index} (seed {run_seed}) level {}: open border", level.number);
            }
            if find_safe_tile(grid, level.dungeon.spawn_tile).is_none() {
                bail!("run {run_index} (seed {run_seed}) level {}: no safe start", level.number);
            }
            floor_cells += grid.floor_count();
            run.advance();
        }
        info!("run {run_index} (seed {run_seed}) passed");
    }

    println!("All {} runs passed; {} floor cells checked.", args.runs, floor_cells);
    Ok(())
}

//! Seed derivation and pseudo-random draws used by map generation.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use xxhash_rust::xxh3::xxh3_64;

static RUNTIME_SEED_DRAWS: AtomicU64 = AtomicU64::new(0);

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Picks a fresh seed for callers that do not need reproducible output.
/// Hashes wall-clock time, process id and a per-process draw number.
pub fn runtime_seed() -> u64 {
    let clock = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_nanos());
    let draw = RUNTIME_SEED_DRAWS.fetch_add(1, Ordering::Relaxed);

    let mut entropy = [0_u8; 28];
    entropy[..16].copy_from_slice(&clock.to_le_bytes());
    entropy[16..20].copy_from_slice(&process::id().to_le_bytes());
    entropy[20..].copy_from_slice(&draw.to_le_bytes());
    xxh3_64(&entropy)
}

pub fn derive_level_seed(run_seed: u64, level: u32) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= u64::from(level).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mix_seed(mixed)
}

fn mix_seed(seed: u64) -> u64 {
    let mut mixed = seed;
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// Uniform draw in `min_value..=max_value`.
pub(super) fn random_usize(rng: &mut ChaCha8Rng, min_value: usize, max_value: usize) -> usize {
    debug_assert!(min_value <= max_value);
    let range_size = (max_value - min_value) as u64 + 1;
    min_value + (rng.next_u64() % range_size) as usize
}

/// Uniform draw in `[0, 1)`.
pub(super) fn random_unit(rng: &mut ChaCha8Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
}

pub(super) fn coin_flip(rng: &mut ChaCha8Rng) -> bool {
    rng.next_u64() & 1 == 1
}

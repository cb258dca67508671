//! Level progression rules used when populating a generated map.

pub const STARTING_LEVEL: u32 = 1;

/// One enemy on the first level, one more for every level after it.
pub fn enemy_spawn_count(level: u32) -> usize {
    1 + level.saturating_sub(STARTING_LEVEL) as usize
}

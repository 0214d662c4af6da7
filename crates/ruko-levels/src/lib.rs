//! Ruko built-in levels.
//!
//! Fifteen fixed levels on a 6×6 grid, introducing one concept at a time:
//! sequences (1-3), loops (4-7), conditionals (8-10), functions (11-12)
//! and mixed challenges (13-15). Each level's palette grows with the
//! concepts taught so far.

mod catalog;

pub use catalog::{LevelCatalog, GRID_SIZE};

use ruko_types::level::Level;
use ruko_types::world::WorldError;
use thiserror::Error;

/// Number of built-in levels. Ids run from 1 to this value.
pub const LEVEL_COUNT: u32 = 15;

#[derive(Debug, Clone, Error)]
pub enum LevelError {
    #[error("no built-in level {0} (levels are 1..=15)")]
    UnknownLevel(u32),

    #[error("built-in level {id} is invalid: {source}")]
    Invalid {
        id: u32,
        #[source]
        source: WorldError,
    },
}

/// Every built-in level, in order.
pub fn levels() -> Vec<Level> {
    LevelCatalog::new().into_levels()
}

/// The built-in level with `id`, checked against the world invariants.
pub fn level(id: u32) -> Result<Level, LevelError> {
    let level = LevelCatalog::new()
        .get(id)
        .cloned()
        .ok_or(LevelError::UnknownLevel(id))?;
    level
        .validate()
        .map_err(|source| LevelError::Invalid { id, source })?;
    Ok(level)
}

//! Session configuration.
//!
//! Defaults mirror the stock game setup: an 8x8 board with 5 colors, and a
//! 100-move simulation that only plays match-producing moves.
use crate::error::EngineError;
use crate::sampler::MoveStrategy;

/// Largest supported color count; ids are written as single base-36 digits.
pub const MAX_COLORS: u8 = 36;

/// Board dimensions, palette size and RNG seed for a new game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub color_count: u8,
    /// Fixed seed for reproducible games; `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 8,
            columns: 8,
            color_count: 5,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(rows: usize, columns: usize, color_count: u8) -> Self {
        GameConfig {
            rows,
            columns,
            color_count,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every count is positive and the palette fits `MAX_COLORS`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must have at least one row and one column, got {}x{}",
                self.rows, self.columns
            )));
        }
        validate_color_count(self.color_count)
    }
}

pub(crate) fn validate_color_count(color_count: u8) -> Result<(), EngineError> {
    if color_count == 0 || color_count > MAX_COLORS {
        return Err(EngineError::InvalidConfig(format!(
            "color count must be between 1 and {}, got {}",
            MAX_COLORS, color_count
        )));
    }
    Ok(())
}

/// Parameters of an unattended simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Number of moves to play.
    pub move_count: usize,
    pub strategy: MoveStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            move_count: 100,
            strategy: MoveStrategy::MatchingOnly,
        }
    }
}

impl SimulationConfig {
    pub fn new(move_count: usize, strategy: MoveStrategy) -> Self {
        SimulationConfig {
            move_count,
            strategy,
        }
    }
}

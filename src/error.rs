//! Error type shared by every engine operation.
//!
//! All variants describe recoverable outcomes. A rejected swap or an
//! exhausted simulation is reported to the caller, never escalated.

use crate::engine::{Cell, Direction};
use thiserror::Error;

/// Outcome kinds an engine call can report instead of succeeding.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The cell, or its neighbor in the requested direction, lies outside the grid.
    #[error("cannot move {cell} {direction}: target is outside the board")]
    OutOfBounds { cell: Cell, direction: Direction },

    /// The swap is well formed but neither tile ends up in a removable pattern.
    #[error("moving {cell} {direction} does not produce a match")]
    NoMatchProduced { cell: Cell, direction: Direction },

    /// The sampler ran out of legal moves before the move budget was spent.
    #[error("no moves left after {done} of {total} simulated moves")]
    SimulationExhausted { done: usize, total: usize },

    /// Unconstrained sampling needs at least two rows and two columns.
    #[error("a {rows}x{columns} board has no corner/edge partition to sample from")]
    DegenerateBoard { rows: usize, columns: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("simulation worker failed: {0}")]
    WorkerFailed(String),
}

/// Returned when a direction name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown direction '{0}' (expected up, down, left or right)")]
pub struct ParseDirectionError(pub String);

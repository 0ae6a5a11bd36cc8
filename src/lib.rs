//! # Match-Three Engine Library
//!
//! This library provides the rules engine of a tile-matching puzzle: legal
//! swaps, match detection (runs of three or more and 2x2 squares), the
//! destroy / fall / refill cascade, and move generation for unattended play.
//!
//! It is used by two binaries:
//! - `human_player`: plays swaps typed on the command line.
//! - `simulator`: plays a number of moves automatically on a worker thread
//!   and reports progress and score.
//!
//! ## Modules
//! - `engine`: tiles, cells, directions and the `Grid` with its match predicate,
//!   group search and the random tile generator.
//! - `cascade`: settle passes and the `CellDelta` records they produce.
//! - `game`: the `Game` session handle that callers drive.
//! - `sampler`: matching-only and unconstrained move selection.
//! - `simulation`: the simulation driver and its worker thread.
//! - `config`: game and simulation settings.
//! - `error`: the `EngineError` type.
//! - `utils`: parsing boards from text.

pub mod cascade;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod sampler;
pub mod simulation;
pub mod utils;

// Items are reached through their module path, e.g. `match3_engine::game::Game`,
// which keeps the top-level namespace small.

//! Settle cycle: destroy matched groups, let survivors fall, refill the gaps,
//! and repeat until the board is quiescent.
//!
//! Every mutation is recorded as a [`CellDelta`] so a presentation layer can
//! animate the cascade pass by pass.
use crate::engine::{generate_tile, Cell, Grid, Tile};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Upper bound on passes per settle cycle.
///
/// Only reachable when the generator keeps falling back to matching ids,
/// e.g. a single-color board where every refill matches again.
pub const MAX_SETTLE_PASSES: usize = 256;

/// One grid mutation made by a settle pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellDelta {
    /// A matched tile was removed, leaving `at` empty.
    Destroyed { at: Cell, tile: Tile },
    /// A surviving tile fell from `from` to `to`.
    Moved { from: Cell, to: Cell, tile: Tile },
    /// A freshly generated tile was placed at `at`.
    Created { at: Cell, tile: Tile },
}

/// Result of a single destroy / compact / refill pass.
#[derive(Clone, Debug, Default)]
pub struct PassOutcome {
    pub deltas: Vec<CellDelta>,
    /// Number of tiles destroyed by this pass.
    pub destroyed: usize,
    /// Cells to re-examine in the next pass: fall destinations and refills.
    pub dirty: Vec<Cell>,
}

/// Everything a full settle cycle changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// All deltas, in the order they were applied, across every pass.
    pub deltas: Vec<CellDelta>,
    /// Total tiles destroyed; equals the number of `Destroyed` deltas.
    pub destroyed: usize,
    /// Tiles destroyed by each pass, the final zero-pass included.
    pub pass_destroyed: Vec<usize>,
    /// `false` only if the cycle was cut off at `MAX_SETTLE_PASSES`.
    pub settled: bool,
}

impl SettleReport {
    pub fn passes(&self) -> usize {
        self.pass_destroyed.len()
    }

    /// Cells whose final content differs from before the cycle.
    pub fn changed_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .deltas
            .iter()
            .flat_map(|delta| match *delta {
                CellDelta::Destroyed { at, .. } | CellDelta::Created { at, .. } => vec![at],
                CellDelta::Moved { from, to, .. } => vec![from, to],
            })
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }
}

/// Runs one pass over `dirty`.
///
/// 1. Every dirty cell that still holds a tile seeds a group search; all
///    removable tiles found are emptied.
/// 2. In each affected column, starting at its lowest destroyed row, the
///    remaining tiles slide down into the free slots, keeping their order.
/// 3. The empty cells left at the top of those columns are filled bottom-up
///    with generated tiles, each one checked against whatever is already in
///    place, including tiles generated earlier in this pass.
pub fn settle_pass(
    grid: &mut Grid,
    dirty: &[Cell],
    color_count: u8,
    rng: &mut impl Rng,
) -> PassOutcome {
    let mut outcome = PassOutcome::default();

    // Column -> lowest destroyed row.
    let mut lowest: BTreeMap<usize, usize> = BTreeMap::new();
    for &seed in dirty {
        if grid.tile(seed).map_or(true, |tile| tile.is_empty()) {
            continue;
        }
        for cell in grid.find_removable_group(seed) {
            let tile = grid.get(cell);
            grid.set(cell, Tile::Empty);
            outcome.deltas.push(CellDelta::Destroyed { at: cell, tile });
            outcome.destroyed += 1;
            lowest
                .entry(cell.column)
                .and_modify(|row| *row = (*row).min(cell.row))
                .or_insert(cell.row);
        }
    }

    for (&column, &low) in &lowest {
        let mut write = low;
        for read in low..grid.rows() {
            let from = Cell::new(read, column);
            let tile = grid.get(from);
            if tile.is_empty() {
                continue;
            }
            if read != write {
                let to = Cell::new(write, column);
                grid.set(to, tile);
                grid.set(from, Tile::Empty);
                outcome.deltas.push(CellDelta::Moved { from, to, tile });
                outcome.dirty.push(to);
            }
            write += 1;
        }
    }

    for (&column, &low) in &lowest {
        for row in low..grid.rows() {
            let at = Cell::new(row, column);
            if grid.get(at).is_empty() {
                let tile = generate_tile(grid, at, color_count, rng);
                grid.set(at, tile);
                outcome.deltas.push(CellDelta::Created { at, tile });
                outcome.dirty.push(at);
            }
        }
    }

    outcome
}

/// Chains settle passes, starting from `dirty`, until one destroys nothing.
///
/// # Returns
/// A `SettleReport` with the concatenated deltas of every pass. The board is
/// quiescent afterwards unless `settled` is `false`.
pub fn resolve(
    grid: &mut Grid,
    dirty: Vec<Cell>,
    color_count: u8,
    rng: &mut impl Rng,
) -> SettleReport {
    let mut report = SettleReport::default();
    let mut dirty = dirty;

    while report.passes() < MAX_SETTLE_PASSES {
        let pass = settle_pass(grid, &dirty, color_count, rng);
        debug!(
            pass = report.passes(),
            destroyed = pass.destroyed,
            deltas = pass.deltas.len(),
            "settle pass"
        );

        report.pass_destroyed.push(pass.destroyed);
        report.destroyed += pass.destroyed;
        report.deltas.extend(pass.deltas);

        if pass.destroyed == 0 {
            report.settled = true;
            return report;
        }
        dirty = pass.dirty;
    }

    warn!(
        passes = MAX_SETTLE_PASSES,
        destroyed = report.destroyed,
        "settle cycle cut off before the board became quiescent"
    );
    report
}

//! Move generation for unattended play.
//!
//! Two strategies are available:
//! - `MatchingOnly`: try every swap on the board and pick uniformly among the
//!   ones that produce a match.
//! - `Unconstrained`: pick uniformly among *all* legal swaps with a single
//!   random draw, without checking whether the swap matches.
use crate::engine::{Cell, Direction, Grid};
use crate::error::EngineError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use tracing::trace;

/// How the sampler chooses the next move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MoveStrategy {
    /// Only moves guaranteed to produce a match.
    #[default]
    MatchingOnly,
    /// Any legal swap; it may be rejected with `NoMatchProduced`.
    Unconstrained,
}

impl MoveStrategy {
    pub fn from_only_matching(only_matching: bool) -> Self {
        if only_matching {
            MoveStrategy::MatchingOnly
        } else {
            MoveStrategy::Unconstrained
        }
    }
}

/// Swap the tile at `cell` with its neighbor in `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub cell: Cell,
    pub direction: Direction,
}

impl Move {
    pub const fn new(cell: Cell, direction: Direction) -> Self {
        Move { cell, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.cell, self.direction)
    }
}

/// Lists every `(cell, direction)` swap that produces a match.
///
/// Each candidate is tried on the grid and immediately swapped back, so the
/// grid is unchanged when this returns. A pair of cells that matches shows up
/// twice, once from each side.
pub fn matching_moves(grid: &mut Grid) -> Vec<Move> {
    let cells: Vec<Cell> = grid.cells().collect();
    let mut moves = Vec::new();
    for cell in cells {
        for direction in grid.available_directions(cell) {
            if let Ok((a, b)) = grid.try_swap(cell, direction) {
                grid.swap(a, b);
                moves.push(Move::new(cell, direction));
            }
        }
    }
    moves
}

/// Picks a matching move uniformly at random.
///
/// # Returns
/// `None` when the board has no match-producing swap left.
pub fn matching_move(grid: &mut Grid, rng: &mut impl Rng) -> Option<Move> {
    let moves = matching_moves(grid);
    trace!(candidates = moves.len(), "matching moves enumerated");
    moves.choose(rng).copied()
}

/// Number of legal `(cell, direction)` pairs on a `rows x columns` board.
///
/// Corners contribute two directions each, the remaining edge cells three,
/// and interior cells four. Boards with a single row or column have no such
/// partition and yield `0`.
pub fn legal_move_count(rows: usize, columns: usize) -> usize {
    if rows < 2 || columns < 2 {
        return 0;
    }
    let vertical_edge = rows - 2;
    let horizontal_edge = columns - 2;
    let corners = 2 * 4;
    let edges = 3 * (2 * vertical_edge + 2 * horizontal_edge);
    let interior = 4 * vertical_edge * horizontal_edge;
    corners + edges + interior
}

/// Picks one legal swap uniformly over every `(cell, direction)` pair.
///
/// A single draw in `[0, legal_move_count)` is decomposed into a corner, edge
/// or interior cell; the direction is then drawn among that cell's available
/// directions. Since each cell in a category owns the same number of pairs,
/// every pair ends up equally likely.
///
/// # Returns
/// * `Ok(Move)` with an in-bounds cell and direction.
/// * `Err(EngineError::DegenerateBoard)` if the board has fewer than two rows
///   or two columns.
pub fn random_move(grid: &Grid, rng: &mut impl Rng) -> Result<Move, EngineError> {
    let (rows, columns) = (grid.rows(), grid.columns());
    let total = legal_move_count(rows, columns);
    if total == 0 {
        return Err(EngineError::DegenerateBoard { rows, columns });
    }

    let vertical_edge = rows - 2;
    let horizontal_edge = columns - 2;
    let corners = 2 * 4;
    let edges = 3 * (2 * vertical_edge + 2 * horizontal_edge);

    let mut draw = rng.gen_range(0..total);
    let cell = if draw < corners {
        let corner = draw / 2;
        Cell::new(corner / 2 * (rows - 1), corner % 2 * (columns - 1))
    } else {
        draw -= corners;
        if draw < edges {
            let mut edge_cell = draw / 3;
            if edge_cell < 2 * vertical_edge {
                // Left and right edges, corners excluded.
                Cell::new(
                    edge_cell % vertical_edge + 1,
                    edge_cell / vertical_edge * (columns - 1),
                )
            } else {
                // Bottom and top edges, corners excluded.
                edge_cell -= 2 * vertical_edge;
                Cell::new(
                    edge_cell / horizontal_edge * (rows - 1),
                    edge_cell % horizontal_edge + 1,
                )
            }
        } else {
            let interior_cell = (draw - edges) / 4;
            Cell::new(
                interior_cell / horizontal_edge + 1,
                interior_cell % horizontal_edge + 1,
            )
        }
    };

    let directions = grid.available_directions(cell);
    let direction = *directions
        .choose(rng)
        .ok_or(EngineError::DegenerateBoard { rows, columns })?;
    Ok(Move::new(cell, direction))
}

/// Picks the next move under `strategy`.
///
/// `Ok(None)` means the matching-only strategy found no candidate.
pub fn choose_move(
    grid: &mut Grid,
    strategy: MoveStrategy,
    rng: &mut impl Rng,
) -> Result<Option<Move>, EngineError> {
    match strategy {
        MoveStrategy::MatchingOnly => Ok(matching_move(grid, rng)),
        MoveStrategy::Unconstrained => random_move(grid, rng).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_array;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_matching_moves_finds_both_sides_of_a_swap() {
        let mut grid = grid_from_str_array(&["2345", "0010"]).unwrap();
        let before = grid.clone();
        let moves = matching_moves(&mut grid);
        assert_eq!(
            moves,
            vec![
                Move::new(Cell::new(0, 2), Direction::Right),
                Move::new(Cell::new(0, 3), Direction::Left),
            ]
        );
        assert_eq!(grid, before, "trial swaps must be reverted");
    }

    #[test]
    fn test_matching_move_none_when_stuck() {
        let mut grid = grid_from_str_array(&["01", "23"]).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(matching_move(&mut grid, &mut rng), None);
        assert_eq!(
            choose_move(&mut grid, MoveStrategy::MatchingOnly, &mut rng),
            Ok(None)
        );
    }

    #[test]
    fn test_legal_move_count_matches_enumeration() {
        for rows in 2..7 {
            for columns in 2..7 {
                let grid = Grid::new_empty(rows, columns);
                let enumerated: usize = grid
                    .cells()
                    .map(|cell| grid.available_directions(cell).len())
                    .sum();
                assert_eq!(legal_move_count(rows, columns), enumerated, "{}x{}", rows, columns);
            }
        }
        assert_eq!(legal_move_count(1, 9), 0);
    }

    #[test]
    fn test_random_move_rejects_degenerate_boards() {
        let mut rng = SmallRng::seed_from_u64(0);
        for (rows, columns) in [(1, 5), (6, 1), (1, 1)] {
            let grid = Grid::new_empty(rows, columns);
            assert_eq!(
                random_move(&grid, &mut rng),
                Err(EngineError::DegenerateBoard { rows, columns })
            );
        }
    }

    #[test]
    fn test_random_move_is_always_legal() {
        let grid = Grid::new_empty(2, 7);
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..2000 {
            let mv = random_move(&grid, &mut rng).unwrap();
            assert!(grid.in_bounds(mv.cell));
            assert!(grid.neighbor(mv.cell, mv.direction).is_some());
        }
    }

    #[test]
    fn test_random_move_is_uniform_over_legal_pairs() {
        let grid = Grid::new_empty(4, 5);
        let total = legal_move_count(4, 5);
        assert_eq!(total, 62);

        let mut rng = SmallRng::seed_from_u64(2024);
        let per_pair = 3000;
        let mut counts: HashMap<Move, usize> = HashMap::new();
        for _ in 0..total * per_pair {
            *counts.entry(random_move(&grid, &mut rng).unwrap()).or_default() += 1;
        }

        assert_eq!(counts.len(), total, "every legal pair should be drawn");
        let tolerance = per_pair * 15 / 100;
        for (mv, count) in counts {
            assert!(
                count.abs_diff(per_pair) < tolerance,
                "{} drawn {} times, expected about {}",
                mv,
                count,
                per_pair
            );
        }
    }
}

//! Game session: owns the board, the random source and the running score.
use crate::cascade::{self, SettleReport};
use crate::config::{validate_color_count, GameConfig};
use crate::engine::{generate_tile, Cell, Direction, Grid, Tile};
use crate::error::EngineError;
use crate::sampler::{self, Move, MoveStrategy};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Manages the state of a match-three session.
///
/// A `Game` is the engine handle handed to callers: it accepts swap requests,
/// settles the resulting cascades, keeps the score, and supplies moves for
/// auto-play. The board is only mutated through these methods.
///
/// # Examples
/// ```
/// use match3_engine::config::GameConfig;
/// use match3_engine::game::Game;
///
/// let mut game = Game::new(&GameConfig::new(6, 6, 4).with_seed(7)).unwrap();
/// assert!(game.grid().is_quiescent());
///
/// while let Some((mv, report)) = game.auto_play_step().unwrap() {
///     println!("{} destroyed {} tiles", mv, report.destroyed);
///     if game.score() > 30 {
///         break;
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    grid: Grid,
    color_count: u8,
    rng: SmallRng,
    score: u64,
}

impl Game {
    /// Creates a game with a freshly generated board.
    ///
    /// Cells are filled from row `0` upward, left to right, each one chosen
    /// by [`generate_tile`] against the cells already placed. Any match the
    /// generator could not avoid is cleared by an unscored cascade before the
    /// game starts. A single-color board cannot be cleared and is left as
    /// filled.
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let mut grid = Grid::new_empty(config.rows, config.columns);

        let cells: Vec<Cell> = grid.cells().collect();
        for cell in cells {
            let tile = generate_tile(&grid, cell, config.color_count, &mut rng);
            grid.set(cell, tile);
        }

        // With two colors the generator can be cornered into a match.
        let matched = grid.matched_cells();
        let cleared = if matched.is_empty() || config.color_count < 2 {
            0
        } else {
            cascade::resolve(&mut grid, matched, config.color_count, &mut rng).destroyed
        };
        debug!(
            rows = config.rows,
            columns = config.columns,
            colors = config.color_count,
            cleared,
            "board initialized"
        );

        Ok(Game {
            grid,
            color_count: config.color_count,
            rng,
            score: 0,
        })
    }

    /// Creates a game around an existing board, e.g. one parsed from text.
    ///
    /// Every cell must hold an item id below `color_count`.
    pub fn from_grid(grid: Grid, color_count: u8, seed: Option<u64>) -> Result<Self, EngineError> {
        validate_color_count(color_count)?;
        if let Some(cell) = grid
            .cells()
            .find(|&cell| grid.get(cell).id().map_or(true, |id| id >= color_count))
        {
            return Err(EngineError::InvalidConfig(format!(
                "cell {} holds '{}', expected an id below {}",
                cell,
                grid.get(cell).to_char(),
                color_count
            )));
        }
        Ok(Game {
            grid,
            color_count,
            rng: seeded_rng(seed),
            score: 0,
        })
    }

    /// Read-only view of the board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tile_at(&self, cell: Cell) -> Option<Tile> {
        self.grid.tile(cell)
    }

    pub fn color_count(&self) -> u8 {
        self.color_count
    }

    /// Total tiles destroyed since the game started.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Swaps `cell` with its neighbor if the swap produces a match.
    ///
    /// On success the swap stays committed and the two cells are returned;
    /// pass them to [`Game::settle`]. On failure the board is unchanged.
    pub fn try_swap(&mut self, cell: Cell, direction: Direction) -> Result<(Cell, Cell), EngineError> {
        self.grid.try_swap(cell, direction)
    }

    /// Runs settle passes from `dirty` until the board is quiescent and adds
    /// the destroyed tiles to the score.
    pub fn settle(&mut self, dirty: Vec<Cell>) -> SettleReport {
        let report = cascade::resolve(&mut self.grid, dirty, self.color_count, &mut self.rng);
        self.score += report.destroyed as u64;
        report
    }

    /// Applies a player move: validate the swap, then settle the cascade.
    ///
    /// # Returns
    /// * `Ok(SettleReport)` describing every changed cell.
    /// * `Err(EngineError::OutOfBounds)` or `Err(EngineError::NoMatchProduced)`
    ///   with the board untouched.
    pub fn request_swap(&mut self, cell: Cell, direction: Direction) -> Result<SettleReport, EngineError> {
        let (a, b) = self.try_swap(cell, direction)?;
        Ok(self.settle(vec![a, b]))
    }

    /// Lists every match-producing move on the current board.
    pub fn matching_moves(&mut self) -> Vec<Move> {
        sampler::matching_moves(&mut self.grid)
    }

    /// Returns `true` while at least one match-producing move exists.
    pub fn has_matching_move(&mut self) -> bool {
        !self.matching_moves().is_empty()
    }

    /// Asks the sampler for the next move under `strategy`.
    pub fn next_move(&mut self, strategy: MoveStrategy) -> Result<Option<Move>, EngineError> {
        sampler::choose_move(&mut self.grid, strategy, &mut self.rng)
    }

    /// Plays one auto-play turn: a random matching move, fully settled.
    ///
    /// # Returns
    /// `Ok(None)` when no matching move is left.
    pub fn auto_play_step(&mut self) -> Result<Option<(Move, SettleReport)>, EngineError> {
        let Some(mv) = self.next_move(MoveStrategy::MatchingOnly)? else {
            info!(score = self.score, "no more moves");
            return Ok(None);
        };
        let report = self.request_swap(mv.cell, mv.direction)?;
        Ok(Some((mv, report)))
    }
}

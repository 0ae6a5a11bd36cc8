//! Core board model for the match-three engine.
//!
//! This module defines the game's fundamental components:
//! - `Tile`: an item of some color, or an empty slot.
//! - `Cell` and `Direction`: coordinates and the unit moves between them.
//! - `Grid`: the board itself, with cell access, swapping, and the match
//!   predicate / group search that decide which tiles are removable.
//! - `generate_tile`: the random item generator used to fill and refill cells.
//!
//! Row `0` is the bottom of the board. `Direction::Up` increases the row,
//! gravity pulls tiles toward row `0`, and fresh tiles appear at the top.
use crate::error::{EngineError, ParseDirectionError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Minimum number of equal tiles in a straight line that forms a match.
pub const MIN_RUN_LENGTH: usize = 3;

/// Represents the content of a single cell on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// An empty slot, waiting to be filled by gravity or a refill.
    Empty,
    /// An item of the given color id, in `[0, color_count)`.
    Item(u8),
}

impl Tile {
    /// Returns `true` for `Tile::Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    /// Returns the color id, or `None` for an empty slot.
    pub fn id(&self) -> Option<u8> {
        match self {
            Tile::Empty => None,
            Tile::Item(id) => Some(*id),
        }
    }

    /// Converts the tile to its character representation.
    ///
    /// Ids are written as base-36 digits (`0`-`9`, then `a`-`z`), empty slots as `.`.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_engine::engine::Tile;
    /// assert_eq!(Tile::Item(3).to_char(), '3');
    /// assert_eq!(Tile::Item(10).to_char(), 'a');
    /// assert_eq!(Tile::Empty.to_char(), '.');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Item(id) => std::char::from_digit(u32::from(*id), 36).unwrap_or('?'),
        }
    }

    /// Parses the character form produced by [`Tile::to_char`].
    ///
    /// Only lower-case digits are accepted, so every parsed tile prints back
    /// as the same character.
    pub fn from_char(ch: char) -> Option<Tile> {
        match ch {
            '.' => Some(Tile::Empty),
            '0'..='9' | 'a'..='z' => ch.to_digit(36).map(|digit| Tile::Item(digit as u8)),
            _ => None,
        }
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        const PALETTE: [&str; 12] = [
            "41", "42", "43", "44", "45", "46", "101", "102", "103", "104", "105", "106",
        ];
        match self {
            Tile::Empty => "40",
            Tile::Item(id) => PALETTE[usize::from(*id) % PALETTE.len()],
        }
    }
}

/// A `(row, column)` coordinate on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl Cell {
    pub const fn new(row: usize, column: usize) -> Self {
        Cell { row, column }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// One of the four unit moves between orthogonally adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order `available_directions` reports them.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(row, column)` delta of this direction.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts full names or their first letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Represents the game board as a `rows x columns` matrix of `Tile`s.
///
/// The grid only knows about cells and their contents. Game rules layered on
/// top of it (legal swaps, cascades, move sampling) live in `Game`, the
/// `cascade` module and the `sampler` module.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    columns: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid with every cell set to `Tile::Empty`.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::{Cell, Grid, Tile};
    /// let grid = Grid::new_empty(4, 5);
    /// assert_eq!(grid.rows(), 4);
    /// assert_eq!(grid.columns(), 5);
    /// assert_eq!(grid.get(Cell::new(3, 4)), Tile::Empty);
    /// ```
    pub fn new_empty(rows: usize, columns: usize) -> Self {
        Grid {
            rows,
            columns,
            tiles: vec![Tile::Empty; rows * columns],
        }
    }

    /// Builds a grid from row-major tiles, row `0` first.
    ///
    /// Returns `None` when `tiles.len()` is not `rows * columns`.
    pub fn from_tiles(rows: usize, columns: usize, tiles: Vec<Tile>) -> Option<Self> {
        (tiles.len() == rows * columns).then_some(Grid {
            rows,
            columns,
            tiles,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns `true` if `cell` lies on the board.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.columns + cell.column
    }

    /// Returns the tile at `cell`.
    ///
    /// # Panics
    /// Panics if `cell` is outside the board. Use [`Grid::tile`] for a checked read.
    pub fn get(&self, cell: Cell) -> Tile {
        assert!(self.in_bounds(cell), "cell {} is outside the board", cell);
        self.tiles[self.index(cell)]
    }

    /// Returns the tile at `cell`, or `None` if the cell is off the board.
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.in_bounds(cell).then(|| self.tiles[self.index(cell)])
    }

    /// Sets the tile at `cell`.
    ///
    /// # Panics
    /// Panics if `cell` is outside the board.
    pub fn set(&mut self, cell: Cell, tile: Tile) {
        assert!(self.in_bounds(cell), "cell {} is outside the board", cell);
        let index = self.index(cell);
        self.tiles[index] = tile;
    }

    /// Exchanges the tiles of two cells in place.
    ///
    /// # Panics
    /// Panics if either cell is outside the board.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        assert!(self.in_bounds(a) && self.in_bounds(b));
        let (ia, ib) = (self.index(a), self.index(b));
        self.tiles.swap(ia, ib);
    }

    /// Returns the neighbor of `cell` in `direction`, if it is on the board.
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let column = cell.column.checked_add_signed(dc)?;
        let next = Cell::new(row, column);
        self.in_bounds(next).then_some(next)
    }

    /// Lists the directions a tile at `cell` can be swapped in.
    ///
    /// Corner cells have two, edge cells three, interior cells four.
    pub fn available_directions(&self, cell: Cell) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.neighbor(cell, direction).is_some())
            .collect()
    }

    /// Iterates over every cell, row `0` first, left to right.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| Cell::new(row, column)))
    }

    fn holds(&self, cell: Option<Cell>, tile: Tile) -> bool {
        cell.map_or(false, |c| self.get(c) == tile)
    }

    /// Counts consecutive cells equal to `tile` walking away from `cell`,
    /// not counting `cell` itself.
    fn run_length(&self, cell: Cell, direction: Direction, tile: Tile) -> usize {
        let mut count = 0;
        let mut current = cell;
        while let Some(next) = self.neighbor(current, direction) {
            if self.get(next) != tile {
                break;
            }
            count += 1;
            current = next;
        }
        count
    }

    /// Decides whether `tile` placed at `cell` would be part of a removable pattern.
    ///
    /// The tile currently stored at `cell` is ignored; only the neighbors count.
    /// A pattern is either a straight run of at least `MIN_RUN_LENGTH` equal
    /// tiles through `cell`, or a 2x2 square of equal tiles with `cell` as one
    /// of its corners. Empty tiles and off-board cells never match.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::{Cell, Tile};
    /// use match3_engine::utils::grid_from_str_array;
    ///
    /// // Top row first: row 1 is "11.", row 0 is "1..".
    /// let grid = grid_from_str_array(&["11.", "1.."]).unwrap();
    /// assert!(grid.can_match(Cell::new(0, 1), Tile::Item(1))); // completes a square
    /// assert!(!grid.can_match(Cell::new(0, 1), Tile::Item(2)));
    /// ```
    pub fn can_match(&self, cell: Cell, tile: Tile) -> bool {
        if tile.is_empty() || !self.in_bounds(cell) {
            return false;
        }

        let left = self.run_length(cell, Direction::Left, tile);
        let right = self.run_length(cell, Direction::Right, tile);
        let up = self.run_length(cell, Direction::Up, tile);
        let down = self.run_length(cell, Direction::Down, tile);

        let horizontal =
            left + 1 >= MIN_RUN_LENGTH || right + 1 >= MIN_RUN_LENGTH || left + right + 1 >= MIN_RUN_LENGTH;
        let vertical =
            up + 1 >= MIN_RUN_LENGTH || down + 1 >= MIN_RUN_LENGTH || up + down + 1 >= MIN_RUN_LENGTH;

        let corner = |vertical_dir: Direction, horizontal_dir: Direction| {
            let diagonal = self
                .neighbor(cell, vertical_dir)
                .and_then(|c| self.neighbor(c, horizontal_dir));
            self.holds(diagonal, tile)
        };
        let square = (left > 0 && up > 0 && corner(Direction::Up, Direction::Left))
            || (right > 0 && up > 0 && corner(Direction::Up, Direction::Right))
            || (left > 0 && down > 0 && corner(Direction::Down, Direction::Left))
            || (right > 0 && down > 0 && corner(Direction::Down, Direction::Right));

        horizontal || vertical || square
    }

    /// Returns `true` if the tile currently at `cell` is part of a removable pattern.
    pub fn is_matched(&self, cell: Cell) -> bool {
        self.tile(cell).map_or(false, |tile| self.can_match(cell, tile))
    }

    /// Returns every cell whose current tile is part of a removable pattern.
    pub fn matched_cells(&self) -> Vec<Cell> {
        self.cells().filter(|&cell| self.is_matched(cell)).collect()
    }

    /// Returns `true` when no cell on the board is part of a removable pattern.
    pub fn is_quiescent(&self) -> bool {
        !self.cells().any(|cell| self.is_matched(cell))
    }

    /// Finds the removable tiles connected to `seed`.
    ///
    /// Explores the whole 4-connected region of tiles equal to the seed's tile,
    /// including tiles that do not match themselves, so that separate patterns
    /// joined through such tiles are collected together. Only tiles that pass
    /// [`Grid::can_match`] on their own are returned.
    ///
    /// Every cell is visited at most once, so the search terminates even on a
    /// board filled with a single color.
    ///
    /// # Returns
    /// The matching cells sorted by `(row, column)`, or an empty vector when
    /// the seed is empty, off the board, or does not match.
    pub fn find_removable_group(&self, seed: Cell) -> Vec<Cell> {
        let tile = match self.tile(seed) {
            Some(tile) if self.can_match(seed, tile) => tile,
            _ => return Vec::new(),
        };

        let mut group = Vec::new();
        let mut visited = vec![false; self.tiles.len()];
        let mut frontier = vec![seed];
        visited[self.index(seed)] = true;

        while let Some(cell) = frontier.pop() {
            if self.can_match(cell, tile) {
                group.push(cell);
            }
            for direction in Direction::ALL {
                if let Some(next) = self.neighbor(cell, direction) {
                    let index = self.index(next);
                    if !visited[index] && self.tiles[index] == tile {
                        visited[index] = true;
                        frontier.push(next);
                    }
                }
            }
        }

        group.sort_unstable();
        group
    }

    /// Swaps `cell` with its neighbor in `direction` if that produces a match.
    ///
    /// After the exchange, each of the two cells is tested with its new tile.
    /// If neither matches, the exchange is undone and the grid is left exactly
    /// as it was.
    ///
    /// # Returns
    /// * `Ok((cell, neighbor))` with the swap committed.
    /// * `Err(EngineError::OutOfBounds)` if either cell is off the board.
    /// * `Err(EngineError::NoMatchProduced)` if the swap was reverted.
    pub fn try_swap(&mut self, cell: Cell, direction: Direction) -> Result<(Cell, Cell), EngineError> {
        let other = if self.in_bounds(cell) {
            self.neighbor(cell, direction)
        } else {
            None
        };
        let other = other.ok_or(EngineError::OutOfBounds { cell, direction })?;

        self.swap(cell, other);
        if self.is_matched(cell) || self.is_matched(other) {
            Ok((cell, other))
        } else {
            self.swap(cell, other);
            Err(EngineError::NoMatchProduced { cell, direction })
        }
    }

    /// Generates a string representation of the board, top row first.
    ///
    /// The output includes row and column numbers and uses ANSI escape codes
    /// for tile colors. The tile at `highlight`, if any, is marked with `*`.
    pub fn to_string_with_highlight(&self, highlight: Option<Cell>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for column in 0..self.columns {
            output.push_str(&format!("{:<3}", column));
        }
        output.push('\n');

        for row in (0..self.rows).rev() {
            output.push_str(&format!("{:<3}", row));
            for column in 0..self.columns {
                let cell = Cell::new(row, column);
                let tile = self.get(cell);
                let marker = if highlight == Some(cell) { '*' } else { ' ' };
                output.push_str(&format!(
                    "\x1b[1;{}m{}{}\x1b[m ",
                    tile.to_ansi_color_code(),
                    tile.to_char(),
                    marker
                ));
            }
            if row > 0 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

/// Produces a new tile for `cell`, avoiding an immediate match where possible.
///
/// Every color id that would not match at `cell` against the board as it
/// stands is a candidate; one is picked uniformly. When every id would match
/// (tiny boards, one or two colors), any id is picked uniformly instead, so
/// generation always terminates.
///
/// `color_count` must be at least one.
pub fn generate_tile(grid: &Grid, cell: Cell, color_count: u8, rng: &mut impl Rng) -> Tile {
    debug_assert!(color_count > 0, "color_count must be positive");
    let candidates: Vec<u8> = (0..color_count)
        .filter(|&id| !grid.can_match(cell, Tile::Item(id)))
        .collect();
    match candidates.choose(rng) {
        Some(&id) => Tile::Item(id),
        None => Tile::Item(rng.gen_range(0..color_count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_array;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_neighbor_respects_edges() {
        let grid = Grid::new_empty(3, 4);
        let corner = Cell::new(0, 0);
        assert_eq!(grid.neighbor(corner, Direction::Down), None);
        assert_eq!(grid.neighbor(corner, Direction::Left), None);
        assert_eq!(grid.neighbor(corner, Direction::Up), Some(Cell::new(1, 0)));
        assert_eq!(grid.neighbor(corner, Direction::Right), Some(Cell::new(0, 1)));
        assert_eq!(grid.neighbor(Cell::new(2, 3), Direction::Up), None);
        assert_eq!(grid.neighbor(Cell::new(2, 3), Direction::Right), None);
    }

    #[test]
    fn test_available_directions_counts() {
        let grid = Grid::new_empty(3, 3);
        assert_eq!(
            grid.available_directions(Cell::new(0, 0)),
            vec![Direction::Up, Direction::Right]
        );
        assert_eq!(grid.available_directions(Cell::new(0, 1)).len(), 3);
        assert_eq!(grid.available_directions(Cell::new(1, 1)), Direction::ALL.to_vec());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("U".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn test_tile_char_round_trip() {
        assert_eq!(Tile::from_char('.'), Some(Tile::Empty));
        assert_eq!(Tile::from_char('z'), Some(Tile::Item(35)));
        assert_eq!(Tile::from_char('!'), None);
        assert_eq!(Tile::from_char('X'), None);
        for id in 0..36u8 {
            let tile = Tile::Item(id);
            assert_eq!(Tile::from_char(tile.to_char()), Some(tile));
        }
    }

    #[test]
    fn test_can_match_horizontal_runs() {
        let grid = grid_from_str_array(&["....", "00.0"]).unwrap();
        // Two to the left.
        assert!(grid.can_match(Cell::new(0, 2), Tile::Item(0)));
        // Filling the gap joins one left and one right.
        let gap = grid_from_str_array(&["0.0"]).unwrap();
        assert!(gap.can_match(Cell::new(0, 1), Tile::Item(0)));
        // A single neighbor is not enough.
        assert!(!grid.can_match(Cell::new(1, 1), Tile::Item(0)));
        assert!(!grid.can_match(Cell::new(0, 2), Tile::Item(1)));
    }

    #[test]
    fn test_can_match_vertical_runs() {
        let grid = grid_from_str_array(&[".", "1", "1"]).unwrap();
        assert!(grid.can_match(Cell::new(2, 0), Tile::Item(1)));
        let split = grid_from_str_array(&["2", ".", "2"]).unwrap();
        assert!(split.can_match(Cell::new(1, 0), Tile::Item(2)));
    }

    #[test]
    fn test_can_match_square_corners() {
        // Each corner of a would-be square completes it.
        let fixtures: [([&str; 2], Cell); 4] = [
            (["11", "1."], Cell::new(0, 1)),
            (["11", ".1"], Cell::new(0, 0)),
            (["1.", "11"], Cell::new(1, 1)),
            ([".1", "11"], Cell::new(1, 0)),
        ];
        for (rows, cell) in fixtures {
            let grid = grid_from_str_array(&rows).unwrap();
            assert!(grid.can_match(cell, Tile::Item(1)), "square at {:?} missed", rows);
        }
    }

    #[test]
    fn test_can_match_l_shape_is_not_a_square() {
        let grid = grid_from_str_array(&["1.", "1."]).unwrap();
        assert!(!grid.can_match(Cell::new(0, 1), Tile::Item(1)));
        let diagonal_only = grid_from_str_array(&["1.", ".."]).unwrap();
        assert!(!diagonal_only.can_match(Cell::new(0, 1), Tile::Item(1)));
    }

    #[test]
    fn test_empty_never_matches() {
        let grid = grid_from_str_array(&["...", "..."]).unwrap();
        assert!(!grid.can_match(Cell::new(0, 1), Tile::Empty));
        assert!(grid.is_quiescent());
        assert!(!grid.can_match(Cell::new(5, 5), Tile::Item(0)));
    }

    #[test]
    fn test_find_removable_group_column_run_excludes_touching_tile() {
        // Top row first. Column 2 holds a vertical run of 2s; the 2 at (0, 1)
        // touches it but forms neither a run nor a square.
        let grid = grid_from_str_array(&["112", "332", "122"]).unwrap();
        let expected = vec![Cell::new(0, 2), Cell::new(1, 2), Cell::new(2, 2)];
        assert_eq!(grid.find_removable_group(Cell::new(1, 2)), expected);
        assert_eq!(grid.find_removable_group(Cell::new(0, 2)), expected);
        assert!(grid.find_removable_group(Cell::new(0, 1)).is_empty());
    }

    #[test]
    fn test_find_removable_group_crosses_non_matching_tiles() {
        let grid = grid_from_str_array(&["000121", "120012", "212000"]).unwrap();
        let group = grid.find_removable_group(Cell::new(2, 0));
        assert_eq!(
            group,
            vec![
                Cell::new(0, 3),
                Cell::new(0, 4),
                Cell::new(0, 5),
                Cell::new(2, 0),
                Cell::new(2, 1),
                Cell::new(2, 2),
            ]
        );
        // The connectors are part of the region but do not match.
        assert!(!group.contains(&Cell::new(1, 2)));
        assert!(!group.contains(&Cell::new(1, 3)));
    }

    #[test]
    fn test_find_removable_group_single_color_board() {
        let grid = grid_from_str_array(&["0000", "0000", "0000", "0000"]).unwrap();
        let group = grid.find_removable_group(Cell::new(1, 1));
        assert_eq!(group.len(), 16);
        let mut deduped = group.clone();
        deduped.dedup();
        assert_eq!(deduped, group);
    }

    #[test]
    fn test_find_removable_group_non_matching_seed() {
        let grid = grid_from_str_array(&["01", "10"]).unwrap();
        assert!(grid.find_removable_group(Cell::new(0, 0)).is_empty());
        let empty = Grid::new_empty(2, 2);
        assert!(empty.find_removable_group(Cell::new(0, 0)).is_empty());
    }

    #[test]
    fn test_square_is_removed_as_a_whole() {
        let grid = grid_from_str_array(&["0110", "2113"]).unwrap();
        assert_eq!(
            grid.find_removable_group(Cell::new(1, 2)),
            vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 1), Cell::new(1, 2)]
        );
    }

    #[test]
    fn test_try_swap_commits_matching_swap() {
        // Moving the 1 at (1, 2) down lines it up with the two 1s in row 0.
        let mut grid = grid_from_str_array(&["201", "110"]).unwrap();
        let swapped = grid.try_swap(Cell::new(1, 2), Direction::Down);
        assert_eq!(swapped, Ok((Cell::new(1, 2), Cell::new(0, 2))));
        assert_eq!(grid.get(Cell::new(0, 2)), Tile::Item(1));
        assert_eq!(grid.get(Cell::new(1, 2)), Tile::Item(0));
    }

    #[test]
    fn test_try_swap_rejection_leaves_grid_untouched() {
        let mut grid = grid_from_str_array(&["012", "120"]).unwrap();
        let before = grid.clone();
        let result = grid.try_swap(Cell::new(0, 0), Direction::Right);
        assert_eq!(
            result,
            Err(EngineError::NoMatchProduced {
                cell: Cell::new(0, 0),
                direction: Direction::Right
            })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_try_swap_out_of_bounds() {
        let mut grid = grid_from_str_array(&["012", "120"]).unwrap();
        let before = grid.clone();
        assert!(matches!(
            grid.try_swap(Cell::new(0, 0), Direction::Down),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.try_swap(Cell::new(7, 0), Direction::Up),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_generate_tile_avoids_matches() {
        let grid = grid_from_str_array(&["00."]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(generate_tile(&grid, Cell::new(0, 2), 2, &mut rng), Tile::Item(1));
        }
    }

    #[test]
    fn test_generate_tile_falls_back_when_every_id_matches() {
        let grid = grid_from_str_array(&["00."]).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(generate_tile(&grid, Cell::new(0, 2), 1, &mut rng), Tile::Item(0));
    }

    #[test]
    fn test_display_lists_top_row_first() {
        let grid = grid_from_str_array(&["01", "23"]).unwrap();
        let display = format!("{}", grid);
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('0') && lines[0].contains('1'));
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].contains("0 "));
        assert!(lines[2].starts_with("0 "));
    }
}

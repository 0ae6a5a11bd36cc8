use crate::engine::{Cell, Grid, Tile};

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice is one row of the board, listed **top row first**, the
/// way the board is printed. The last slice therefore becomes row `0`, the
/// bottom row that gravity pulls toward.
///
/// Valid characters for tiles are:
/// - `0`-`9`, `a`-`z` (lower case only): `Tile::Item` with the base-36 value
/// - `.`: `Tile::Empty`
///
/// # Returns
/// * `Ok(Grid)` if parsing is successful.
/// * `Err(String)` if:
///     - no rows are given, or the first row is empty;
///     - the rows have different lengths;
///     - an unrecognized character is encountered.
///
/// # Examples
/// ```
/// use match3_engine::engine::{Cell, Tile};
/// use match3_engine::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&[
///     "01.", // row 1 (top)
///     "2a3", // row 0 (bottom)
/// ])
/// .unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.get(Cell::new(1, 0)), Tile::Item(0));
/// assert_eq!(grid.get(Cell::new(1, 2)), Tile::Empty);
/// assert_eq!(grid.get(Cell::new(0, 1)), Tile::Item(10));
///
/// assert!(grid_from_str_array(&["0!1"]).is_err());
/// assert!(grid_from_str_array(&["0X1"]).is_err());
/// assert!(grid_from_str_array(&["012", "01"]).is_err());
/// ```
pub fn grid_from_str_array(s: &[&str]) -> Result<Grid, String> {
    let rows = s.len();
    let columns = s.first().map_or(0, |row| row.chars().count());
    if rows == 0 || columns == 0 {
        return Err("Board must have at least one row and one column".to_string());
    }

    let mut grid = Grid::new_empty(rows, columns);

    for (line, row_str) in s.iter().enumerate() {
        let width = row_str.chars().count();
        if width != columns {
            return Err(format!(
                "Line {} has {} characters (expected {})",
                line, width, columns
            ));
        }

        let row = rows - 1 - line;
        for (column, ch) in row_str.chars().enumerate() {
            let tile = Tile::from_char(ch).ok_or_else(|| {
                format!("Unrecognized character '{}' in line {} col {}", ch, line, column)
            })?;
            grid.set(Cell::new(row, column), tile);
        }
    }
    Ok(grid)
}

/// Renders a grid back into the row strings accepted by [`grid_from_str_array`].
pub fn grid_to_strings(grid: &Grid) -> Vec<String> {
    (0..grid.rows())
        .rev()
        .map(|row| {
            (0..grid.columns())
                .map(|column| grid.get(Cell::new(row, column)).to_char())
                .collect()
        })
        .collect()
}

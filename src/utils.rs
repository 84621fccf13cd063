use crate::engine::{Grid, Tile, MAX_COLORS};

/// Parses an array of string slices into a [`Grid`].
///
/// Each string slice represents one row, starting from row 0 (the top).
/// The column count is taken from the first row and every row must have
/// exactly that many characters — the engine works on fully populated
/// rectangular grids, so no padding is applied.
///
/// Valid characters for tiles are:
/// - 'R': `Tile::Red`
/// - 'G': `Tile::Green`
/// - 'B': `Tile::Blue`
/// - 'Y': `Tile::Yellow`
/// - 'P': `Tile::Purple`
/// - '.': `Tile::Empty`
///
/// `color_count` becomes the grid's refill palette; every colored tile in
/// the text must belong to it (e.g. 'Y' is an error when `color_count` is 3).
///
/// # Arguments
/// * `rows`: the rows of the grid, top to bottom.
/// * `color_count`: the palette size the grid refills from, `1..=5`.
///
/// # Returns
/// * `Ok(Grid)` if parsing succeeds.
/// * `Err(String)` if `rows` is empty, a row's width differs from the
///   first row's, a character is unrecognized, or a tile falls outside the
///   declared palette.
///
/// # Examples
/// ```
/// use tilematch::utils::grid_from_str_rows;
/// use tilematch::engine::Tile;
///
/// let grid = grid_from_str_rows(&["RG.", "BGR"], 3).unwrap();
/// assert_eq!(grid.cols(), 3);
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.tile(0, 0), Tile::Red);
/// assert_eq!(grid.tile(2, 0), Tile::Empty);
/// assert_eq!(grid.tile(0, 1), Tile::Blue);
///
/// assert!(grid_from_str_rows(&["RXB"], 3).is_err());
/// ```
pub fn grid_from_str_rows(rows: &[&str], color_count: usize) -> Result<Grid, String> {
    if rows.is_empty() {
        return Err("Expected at least one row".to_string());
    }
    if !(1..=MAX_COLORS).contains(&color_count) {
        return Err(format!(
            "color_count must be in 1..={}, got {}",
            MAX_COLORS, color_count
        ));
    }

    let cols = rows[0].chars().count();
    if cols == 0 {
        return Err("Row 0 is empty; grids need at least one column".to_string());
    }

    let mut grid = Grid::new_empty(cols, rows.len(), color_count);

    for (r, row_str) in rows.iter().enumerate() {
        if row_str.chars().count() != cols {
            return Err(format!(
                "Row {} has {} characters, expected {} (all rows must match row 0)",
                r,
                row_str.chars().count(),
                cols
            ));
        }

        for (c, ch) in row_str.chars().enumerate() {
            let tile = Tile::from_char(ch).ok_or_else(|| {
                format!("Unrecognized character '{}' in row {} col {}", ch, r, c)
            })?;
            if let Some(index) = tile.color_index() {
                if index > color_count {
                    return Err(format!(
                        "Tile '{}' in row {} col {} is outside the {}-color palette",
                        ch, r, c, color_count
                    ));
                }
            }
            grid.set_tile(c, r, tile);
        }
    }
    Ok(grid)
}

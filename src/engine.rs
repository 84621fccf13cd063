//! Core board engine for the tile-matching game.
//!
//! This module defines the game's fundamental components:
//! - `Tile`: Represents the different tile contents on the grid.
//! - `Grid`: Represents the game grid and includes the board operations
//!   the convergence loop is built from: swapping, run detection
//!   (marking), removal of marked tiles, gravity, and top-row refill.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Represents the content of a single grid cell.
///
/// Each variant corresponds to a specific color or an empty state. A cell
/// always holds exactly one `Tile`; "blank" is modelled as `Tile::Empty`,
/// never as a missing value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Represents an empty cell.
    Empty,
    /// Represents a red tile.
    Red,
    /// Represents a green tile.
    Green,
    /// Represents a blue tile.
    Blue,
    /// Represents a yellow tile.
    Yellow,
    /// Represents a purple tile.
    Purple,
}

/// The largest palette the engine supports. A grid's `color_count` must be
/// in `1..=MAX_COLORS`; the classic game uses 3.
pub const MAX_COLORS: usize = 5;

/// The default minimum run length for a match.
pub const DEFAULT_MIN_RUN: usize = 3;

// Private helper for generating random tile colors. Used by the random
// constructors and by `Grid::refill_top_row` so that generated tiles are
// always colored, never `Tile::Empty`.
fn random_tile_color(rng: &mut impl Rng, color_count: usize) -> Tile {
    match rng.gen_range(0..color_count) {
        0 => Tile::Red,
        1 => Tile::Green,
        2 => Tile::Blue,
        3 => Tile::Yellow,
        4 => Tile::Purple,
        _ => unreachable!("color_count is validated at construction"),
    }
}

impl Tile {
    /// Converts the tile to its character representation.
    ///
    /// This is the text form used by [`crate::utils::grid_from_str_rows`]
    /// and by test fixtures.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilematch::engine::Tile;
    /// assert_eq!(Tile::Red.to_char(), 'R');
    /// assert_eq!(Tile::Empty.to_char(), '.');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Red => 'R',
            Tile::Green => 'G',
            Tile::Blue => 'B',
            Tile::Yellow => 'Y',
            Tile::Purple => 'P',
        }
    }

    /// Parses a tile from its character representation.
    ///
    /// Returns `None` for any character outside `['.', 'R', 'G', 'B', 'Y', 'P']`.
    pub fn from_char(ch: char) -> Option<Tile> {
        match ch {
            '.' => Some(Tile::Empty),
            'R' => Some(Tile::Red),
            'G' => Some(Tile::Green),
            'B' => Some(Tile::Blue),
            'Y' => Some(Tile::Yellow),
            'P' => Some(Tile::Purple),
            _ => None,
        }
    }

    /// Returns the 1-based palette index of a colored tile, or `None` for
    /// `Tile::Empty`. A tile belongs to an `n`-color palette iff its index
    /// is at most `n`.
    pub fn color_index(&self) -> Option<usize> {
        match self {
            Tile::Empty => None,
            Tile::Red => Some(1),
            Tile::Green => Some(2),
            Tile::Blue => Some(3),
            Tile::Yellow => Some(4),
            Tile::Purple => Some(5),
        }
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Tile::Empty => "40",
            Tile::Red => "41",
            Tile::Green => "42",
            Tile::Blue => "44",
            Tile::Yellow => "43",
            Tile::Purple => "45",
        }
    }
}

/// Represents the game grid as a `cols x rows` field of [`Tile`]s.
///
/// Coordinates are `(col, row)` with column 0 at the left and row 0 at the
/// top. Every coordinate holds exactly one tile at every observable point;
/// the grid also carries a per-cell pending-removal flag that run detection
/// sets and [`Grid::remove_marked`] consumes.
///
/// The mutating operations — [`Grid::swap`], [`Grid::find_runs`] /
/// [`Grid::remove_marked`], [`Grid::collapse_step`] (gravity) and
/// [`Grid::refill_top_row`] — are the only ways the engine changes cell
/// contents between observable states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    color_count: usize,
    /// Column-major storage: cell `(col, row)` lives at `col * rows + row`.
    cells: Vec<Tile>,
    /// Pending-removal flags, same indexing as `cells`.
    marks: Vec<bool>,
}

impl Grid {
    fn assert_dimensions(cols: usize, rows: usize, color_count: usize) {
        assert!(cols >= 1 && rows >= 1, "grid dimensions must be positive");
        assert!(
            (1..=MAX_COLORS).contains(&color_count),
            "color_count must be in 1..={}",
            MAX_COLORS
        );
    }

    /// Creates a new grid with every cell set to `Tile::Empty`.
    ///
    /// # Panics
    /// Panics if `cols` or `rows` is zero, or if `color_count` is outside
    /// `1..=MAX_COLORS`. These are construction-time programming errors,
    /// not runtime conditions.
    ///
    /// # Examples
    /// ```
    /// use tilematch::engine::{Grid, Tile};
    /// let grid = Grid::new_empty(6, 6, 3);
    /// assert_eq!(grid.tile(0, 0), Tile::Empty);
    /// ```
    pub fn new_empty(cols: usize, rows: usize, color_count: usize) -> Self {
        Self::assert_dimensions(cols, rows, color_count);
        Grid {
            cols,
            rows,
            color_count,
            cells: vec![Tile::Empty; cols * rows],
            marks: vec![false; cols * rows],
        }
    }

    /// Creates a new grid with every cell set to a random non-Empty color
    /// drawn uniformly from the first `color_count` palette entries.
    ///
    /// Uses a fixed internal seed so repeated calls are deterministic and
    /// produce the same grid, which keeps demo sessions and tests
    /// reproducible. Use [`Grid::new_random_with_seed`] for other layouts.
    pub fn new_random(cols: usize, rows: usize, color_count: usize) -> Self {
        Self::new_random_with_seed(cols, rows, color_count, 424242)
    }

    /// Creates a new grid with every cell set to a random non-Empty color,
    /// seeding the generator with `seed`.
    ///
    /// The same seed always produces the same grid; different seeds will
    /// generally differ. No `Tile::Empty` is ever generated here.
    pub fn new_random_with_seed(cols: usize, rows: usize, color_count: usize, seed: u64) -> Self {
        let mut grid = Self::new_empty(cols, rows, color_count);
        let mut rng = SmallRng::seed_from_u64(seed);
        for col in 0..cols {
            for row in 0..rows {
                grid.set_tile(col, row, random_tile_color(&mut rng, color_count));
            }
        }
        grid
    }

    /// The number of columns in the grid.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The number of rows in the grid.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of palette colors this grid refills from.
    pub fn color_count(&self) -> usize {
        self.color_count
    }

    /// Returns `true` if `(col, row)` lies inside the grid.
    pub fn in_bounds(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows
    }

    fn idx(&self, col: usize, row: usize) -> usize {
        assert!(
            self.in_bounds(col, row),
            "cell ({}, {}) out of bounds",
            col,
            row
        );
        col * self.rows + row
    }

    /// Returns the tile at `(col, row)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds. Callers holding
    /// untrusted coordinates should go through [`Grid::swap`], which
    /// bounds-checks and rejects instead.
    pub fn tile(&self, col: usize, row: usize) -> Tile {
        self.cells[self.idx(col, row)]
    }

    /// Sets the tile at `(col, row)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn set_tile(&mut self, col: usize, row: usize, tile: Tile) {
        let i = self.idx(col, row);
        self.cells[i] = tile;
    }

    /// Returns whether the tile at `(col, row)` is flagged pending-removal.
    pub fn is_marked(&self, col: usize, row: usize) -> bool {
        self.marks[self.idx(col, row)]
    }

    /// The number of tiles currently flagged pending-removal.
    pub fn marked_count(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    /// Returns `true` if no cell holds `Tile::Empty`.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&t| t != Tile::Empty)
    }

    // Exchanges two cells, carrying the pending-removal flag with the tile.
    fn swap_cells(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
        self.marks.swap(a, b);
    }

    /// Exchanges the tile occupants of two cells.
    ///
    /// There is no adjacency constraint: any two in-bounds cells may be
    /// swapped. If either coordinate is out of bounds nothing is mutated
    /// and `false` is returned — the "drop outside the grid" case, where
    /// the dragged tile snaps back to its cell.
    ///
    /// # Returns
    /// `true` if the swap was performed, `false` if it was rejected.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> bool {
        if !self.in_bounds(a.0, a.1) || !self.in_bounds(b.0, b.1) {
            return false;
        }
        let (ia, ib) = (self.idx(a.0, a.1), self.idx(b.0, b.1));
        self.swap_cells(ia, ib);
        true
    }

    // Counts the run of identical non-Empty tiles extending rightward from
    // `(col, row)` and flags every tile in it when the run reaches
    // `min_run`. Returns whether anything was flagged.
    fn mark_run_right(&mut self, col: usize, row: usize, min_run: usize) -> bool {
        let first = self.tile(col, row);
        if first == Tile::Empty {
            return false;
        }
        let mut len = 0;
        for c in col..self.cols {
            if self.tile(c, row) != first {
                break;
            }
            len += 1;
        }
        if len < min_run {
            return false;
        }
        for c in col..col + len {
            let i = self.idx(c, row);
            self.marks[i] = true;
        }
        true
    }

    // Downward counterpart of `mark_run_right`.
    fn mark_run_down(&mut self, col: usize, row: usize, min_run: usize) -> bool {
        let first = self.tile(col, row);
        if first == Tile::Empty {
            return false;
        }
        let mut len = 0;
        for r in row..self.rows {
            if self.tile(col, r) != first {
                break;
            }
            len += 1;
        }
        if len < min_run {
            return false;
        }
        for r in row..row + len {
            let i = self.idx(col, r);
            self.marks[i] = true;
        }
        true
    }

    /// Scans every row left-to-right and every column top-to-bottom, and
    /// flags every tile belonging to a run of at least `min_run` identical
    /// non-Empty tiles as pending-removal.
    ///
    /// Marking is a boolean OR: a tile may be flagged by both a row run and
    /// a column run, and calling this twice without mutating the grid in
    /// between flags exactly the same set. `Tile::Empty` never participates
    /// in a run.
    ///
    /// # Returns
    /// `true` if any run of length >= `min_run` exists on the grid.
    pub fn find_runs(&mut self, min_run: usize) -> bool {
        let mut found = false;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.mark_run_right(col, row, min_run) {
                    found = true;
                }
                if self.mark_run_down(col, row, min_run) {
                    found = true;
                }
            }
        }
        found
    }

    /// Sets every pending-removal tile to `Tile::Empty` and clears all
    /// flags. Pure grid mutation: no gravity or refill happens here.
    pub fn remove_marked(&mut self) {
        for i in 0..self.cells.len() {
            if self.marks[i] {
                self.cells[i] = Tile::Empty;
                self.marks[i] = false;
            }
        }
    }

    /// Performs one full gravity pass.
    ///
    /// For each row from the second-to-bottom upward and each column, a
    /// non-Empty tile sitting directly above an Empty cell drops one row.
    /// A single pass moves each tile a bounded number of steps; repeat
    /// until it returns `false` (or call [`Grid::settle`]) to reach the
    /// fixed point where every column has its Empty cells stacked at the
    /// top and the relative vertical order of its colored tiles preserved.
    ///
    /// # Returns
    /// `true` if any tile moved during this pass.
    pub fn collapse_step(&mut self) -> bool {
        if self.rows < 2 {
            return false;
        }
        let mut moved = false;
        for row in (0..self.rows - 1).rev() {
            for col in 0..self.cols {
                if self.tile(col, row) == Tile::Empty {
                    continue;
                }
                if self.tile(col, row + 1) == Tile::Empty {
                    let (above, below) = (self.idx(col, row), self.idx(col, row + 1));
                    self.swap_cells(above, below);
                    moved = true;
                }
            }
        }
        moved
    }

    /// Repeats [`Grid::collapse_step`] until a full pass moves nothing.
    pub fn settle(&mut self) {
        while self.collapse_step() {}
    }

    /// Refills the top row: every column whose row-0 cell is `Tile::Empty`
    /// receives a random color from the grid's palette.
    ///
    /// Interleave with [`Grid::settle`] to fill a column with several
    /// holes: settling pulls the new tile down and re-opens the top cell.
    ///
    /// # Returns
    /// `true` if at least one cell was refilled.
    pub fn refill_top_row(&mut self, rng: &mut impl Rng) -> bool {
        let mut refilled = false;
        for col in 0..self.cols {
            if self.tile(col, 0) == Tile::Empty {
                let tile = random_tile_color(rng, self.color_count);
                self.set_tile(col, 0, tile);
                refilled = true;
            }
        }
        refilled
    }
}

impl fmt::Display for Grid {
    /// Formats the grid for terminal display: a column-index header, one
    /// line per row with its row index, and ANSI background colors for the
    /// tiles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..self.cols {
            write!(f, "{:<2}", col)?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "{:<2}", row)?;
            for col in 0..self.cols {
                let color_code = self.tile(col, row).to_ansi_color_code();
                write!(f, "\x1b[1;{};m  \x1b[m", color_code)?;
            }
            if row < self.rows - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_rows;

    #[test]
    fn test_new_empty_grid() {
        let grid = Grid::new_empty(6, 6, 3);
        for col in 0..6 {
            for row in 0..6 {
                assert_eq!(grid.tile(col, row), Tile::Empty);
                assert!(!grid.is_marked(col, row));
            }
        }
        assert!(!grid.is_full());
    }

    #[test]
    #[should_panic(expected = "color_count")]
    fn test_new_empty_rejects_oversized_palette() {
        Grid::new_empty(6, 6, MAX_COLORS + 1);
    }

    #[test]
    fn test_new_random_never_empty() {
        let grid = Grid::new_random(8, 8, 3);
        for col in 0..8 {
            for row in 0..8 {
                assert_ne!(
                    grid.tile(col, row),
                    Tile::Empty,
                    "random grid must not contain Empty tiles"
                );
                // 3-color palette: indices 1..=3 only.
                assert!(grid.tile(col, row).color_index().unwrap() <= 3);
            }
        }
        assert!(grid.is_full());

        // Fixed-seed determinism.
        let again = Grid::new_random(8, 8, 3);
        assert_eq!(grid, again, "new_random() should be deterministic");
    }

    #[test]
    fn test_new_random_with_seed_determinism() {
        let a = Grid::new_random_with_seed(6, 6, 3, 7);
        let b = Grid::new_random_with_seed(6, 6, 3, 7);
        assert_eq!(a, b, "grids with the same seed must be identical");

        let c = Grid::new_random_with_seed(6, 6, 3, 8);
        assert_ne!(a, c, "grids with different seeds should differ");
    }

    #[test]
    fn test_tile_char_roundtrip() {
        for tile in [
            Tile::Empty,
            Tile::Red,
            Tile::Green,
            Tile::Blue,
            Tile::Yellow,
            Tile::Purple,
        ] {
            assert_eq!(Tile::from_char(tile.to_char()), Some(tile));
        }
        assert_eq!(Tile::from_char('X'), None);
    }

    #[test]
    fn test_swap_in_bounds() {
        let mut grid = grid_from_str_rows(&["RG", "BG"], 3).unwrap();
        assert!(grid.swap((0, 0), (1, 1)));
        assert_eq!(grid.tile(0, 0), Tile::Green);
        assert_eq!(grid.tile(1, 1), Tile::Red);
    }

    #[test]
    fn test_swap_non_adjacent_allowed() {
        let mut grid = grid_from_str_rows(&["R..G", "....", "....", "...B"], 3).unwrap();
        assert!(grid.swap((0, 0), (3, 3)));
        assert_eq!(grid.tile(0, 0), Tile::Blue);
        assert_eq!(grid.tile(3, 3), Tile::Red);
    }

    #[test]
    fn test_swap_out_of_bounds_is_rejected_noop() {
        let mut grid = grid_from_str_rows(&["RG", "BG"], 3).unwrap();
        let before = grid.clone();
        assert!(!grid.swap((0, 0), (2, 0)));
        assert!(!grid.swap((0, 5), (1, 1)));
        assert_eq!(grid, before, "rejected swap must not mutate the grid");
    }

    #[test]
    fn test_find_runs_row_boundary_prefix() {
        // Exactly the first three cells form a qualifying run.
        let mut grid = grid_from_str_rows(&["RRRBB"], 3).unwrap();
        assert!(grid.find_runs(3));
        let marked: Vec<bool> = (0..5).map(|c| grid.is_marked(c, 0)).collect();
        assert_eq!(marked, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_find_runs_row_boundary_suffix() {
        let mut grid = grid_from_str_rows(&["RRBBB"], 3).unwrap();
        assert!(grid.find_runs(3));
        let marked: Vec<bool> = (0..5).map(|c| grid.is_marked(c, 0)).collect();
        assert_eq!(marked, vec![false, false, true, true, true]);
    }

    #[test]
    fn test_find_runs_column() {
        let mut grid = grid_from_str_rows(&["RG", "RG", "RB"], 3).unwrap();
        assert!(grid.find_runs(3));
        assert!(grid.is_marked(0, 0));
        assert!(grid.is_marked(0, 1));
        assert!(grid.is_marked(0, 2));
        assert!(!grid.is_marked(1, 0));
        assert!(!grid.is_marked(1, 1));
        assert!(!grid.is_marked(1, 2));
    }

    #[test]
    fn test_find_runs_cross_overlap() {
        // Center tile belongs to both a row run and a column run; marking
        // must OR, not double-count or toggle.
        let mut grid = grid_from_str_rows(&[".R.", "RRR", ".R."], 3).unwrap();
        assert!(grid.find_runs(3));
        assert_eq!(grid.marked_count(), 5);
        assert!(grid.is_marked(1, 1));
    }

    #[test]
    fn test_find_runs_empty_never_matches() {
        let mut grid = grid_from_str_rows(&["...", "...", "..."], 3).unwrap();
        assert!(!grid.find_runs(3));
        assert_eq!(grid.marked_count(), 0);
    }

    #[test]
    fn test_find_runs_is_idempotent() {
        let mut grid = grid_from_str_rows(&["RRRBB", "GGBBB"], 3).unwrap();
        assert!(grid.find_runs(3));
        let first: Vec<bool> = (0..5)
            .flat_map(|c| (0..2).map(move |r| (c, r)))
            .map(|(c, r)| grid.is_marked(c, r))
            .collect();
        assert!(grid.find_runs(3));
        let second: Vec<bool> = (0..5)
            .flat_map(|c| (0..2).map(move |r| (c, r)))
            .map(|(c, r)| grid.is_marked(c, r))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_runs_respects_min_run() {
        let mut grid = grid_from_str_rows(&["RRRBB"], 3).unwrap();
        assert!(!grid.find_runs(4));
        assert_eq!(grid.marked_count(), 0);
        assert!(grid.find_runs(2));
        assert_eq!(grid.marked_count(), 5);
    }

    #[test]
    fn test_remove_marked() {
        let mut grid = grid_from_str_rows(&["RRRBB"], 3).unwrap();
        grid.find_runs(3);
        grid.remove_marked();
        assert_eq!(grid.tile(0, 0), Tile::Empty);
        assert_eq!(grid.tile(1, 0), Tile::Empty);
        assert_eq!(grid.tile(2, 0), Tile::Empty);
        assert_eq!(grid.tile(3, 0), Tile::Blue);
        assert_eq!(grid.tile(4, 0), Tile::Blue);
        assert_eq!(grid.marked_count(), 0, "flags must be cleared");
    }

    #[test]
    fn test_gravity_pushes_empties_to_top_preserving_order() {
        // Column top->bottom: [R, ., G, ., B] must settle to [., ., R, G, B].
        let mut grid = grid_from_str_rows(&["R", ".", "G", ".", "B"], 3).unwrap();
        grid.settle();
        assert_eq!(grid.tile(0, 0), Tile::Empty);
        assert_eq!(grid.tile(0, 1), Tile::Empty);
        assert_eq!(grid.tile(0, 2), Tile::Red);
        assert_eq!(grid.tile(0, 3), Tile::Green);
        assert_eq!(grid.tile(0, 4), Tile::Blue);
    }

    #[test]
    fn test_gravity_columns_are_independent() {
        let mut grid = grid_from_str_rows(&["R.B", ".G.", "..."], 3).unwrap();
        grid.settle();
        let expected = grid_from_str_rows(&["...", "...", "RGB"], 3).unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_gravity_settled_grid_is_fixed_point() {
        let mut grid = grid_from_str_rows(&["...", "RGB", "BGR"], 3).unwrap();
        let before = grid.clone();
        assert!(!grid.collapse_step());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_refill_top_row_fills_only_empty_cells() {
        let mut grid = grid_from_str_rows(&[".R.", "GGB"], 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(grid.refill_top_row(&mut rng));
        assert_ne!(grid.tile(0, 0), Tile::Empty);
        assert_eq!(grid.tile(1, 0), Tile::Red, "occupied top cell untouched");
        assert_ne!(grid.tile(2, 0), Tile::Empty);
        assert!(grid.is_full());

        assert!(
            !grid.refill_top_row(&mut rng),
            "full top row refills nothing"
        );
    }

    #[test]
    fn test_refill_respects_palette() {
        let mut grid = Grid::new_empty(8, 1, 2);
        let mut rng = SmallRng::seed_from_u64(5);
        grid.refill_top_row(&mut rng);
        for col in 0..8 {
            let idx = grid.tile(col, 0).color_index().unwrap();
            assert!(idx <= 2, "2-color palette must only yield Red/Green");
        }
    }

    #[test]
    fn test_marks_travel_with_swapped_tiles() {
        let mut grid = grid_from_str_rows(&["RRRB"], 3).unwrap();
        grid.find_runs(3);
        grid.swap((0, 0), (3, 0));
        assert!(grid.is_marked(3, 0), "flag follows the tile, not the cell");
        assert!(!grid.is_marked(0, 0));
    }

    #[test]
    fn test_display_contains_indices() {
        let grid = Grid::new_empty(4, 3, 3);
        let shown = format!("{}", grid);
        assert!(shown.contains("0 1 2 3"), "missing column header");
        assert_eq!(
            shown.trim_end().lines().count(),
            4,
            "header plus one line per row"
        );
    }
}

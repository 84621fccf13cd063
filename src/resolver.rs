//! Convergence state machine driving the match-remove-refill loop.
//!
//! [`MatchEngine`] owns a [`Grid`] and resolves exactly one player swap at
//! a time: `Checking -> Removing -> Collapsing -> Refilling -> Checking`
//! until a checking pass finds no run, then back to `Idle`. The whole loop
//! runs synchronously inside [`MatchEngine::resolve_swap`]; the input layer
//! must not dispatch another swap while a resolution is in flight, which
//! the exclusive `&mut self` borrow already enforces.
use crate::engine::{Grid, DEFAULT_MIN_RUN};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// The phases of the resolution state machine.
///
/// Outside of [`MatchEngine::resolve_swap`] the engine is always `Idle`;
/// the other phases are the internal stations of one convergence cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No resolution in progress; the grid is stable.
    Idle,
    /// Scanning for runs of the minimum length.
    Checking,
    /// Clearing the tiles flagged by the last check.
    Removing,
    /// Letting tiles fall until every column is settled.
    Collapsing,
    /// Feeding new random tiles in through the top row.
    Refilling,
}

/// Summary of one completed [`MatchEngine::resolve_swap`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the swap was performed. `false` means an out-of-bounds
    /// coordinate was supplied and nothing was mutated (the dragged tile
    /// snaps back; purely a rendering concern for the caller).
    pub swapped: bool,
    /// Number of checking passes that found at least one run. Zero means
    /// the swap matched nothing and was kept as-is.
    pub cascades: u32,
    /// Total number of tiles cleared across all cascades.
    pub tiles_cleared: u32,
}

impl Resolution {
    fn rejected() -> Self {
        Resolution {
            swapped: false,
            cascades: 0,
            tiles_cleared: 0,
        }
    }
}

/// Resolves player swaps against a grid until it is stable again.
///
/// # Examples
/// ```
/// use tilematch::engine::Grid;
/// use tilematch::resolver::MatchEngine;
///
/// let grid = Grid::new_random(6, 6, 3);
/// let mut engine = MatchEngine::new(grid);
/// let res = engine.resolve_swap((0, 0), (1, 0));
/// assert!(res.swapped);
/// assert!(engine.grid().is_full());
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine {
    grid: Grid,
    min_run: usize,
    rng: SmallRng,
    phase: Phase,
}

impl MatchEngine {
    /// Creates an engine over `grid` with the default run threshold and a
    /// fixed refill seed, so identical swap sequences replay identically.
    pub fn new(grid: Grid) -> Self {
        Self::with_seed(grid, 424242)
    }

    /// Creates an engine whose refill generator is seeded with `seed`.
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        MatchEngine {
            grid,
            min_run: DEFAULT_MIN_RUN,
            rng: SmallRng::seed_from_u64(seed),
            phase: Phase::Idle,
        }
    }

    /// Sets the minimum run length required for a match.
    ///
    /// # Panics
    /// Panics if `min_run < 2`: with a threshold of 1 every tile is its own
    /// run and the convergence loop could never reach a run-free grid.
    pub fn with_min_run(mut self, min_run: usize) -> Self {
        assert!(min_run >= 2, "min_run must be at least 2");
        self.min_run = min_run;
        self
    }

    /// The grid in its current state. After [`MatchEngine::resolve_swap`]
    /// returns, this is the stable mapping the renderer reads.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The current phase. `Idle` whenever no resolution is in progress.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The minimum run length required for a match.
    pub fn min_run(&self) -> usize {
        self.min_run
    }

    /// Resolves one player swap to a stable grid.
    ///
    /// Performs the swap, then loops: check for runs; if any were found,
    /// remove them, let the columns settle, and refill through the top row
    /// (settling after each refill) until the grid is full again. New tiles
    /// may form new runs, so the loop repeats until a checking pass comes
    /// up empty.
    ///
    /// A swap that matches nothing is still kept — the source game never
    /// reverts a non-matching exchange. A swap with an out-of-bounds
    /// coordinate is rejected without mutating anything.
    ///
    /// Post-conditions when `swapped` is `true`: the grid is full, contains
    /// no run of length >= `min_run`, and the engine is `Idle`.
    pub fn resolve_swap(&mut self, src: (usize, usize), dst: (usize, usize)) -> Resolution {
        if !self.grid.swap(src, dst) {
            return Resolution::rejected();
        }

        let mut cascades = 0;
        let mut tiles_cleared = 0;
        loop {
            self.phase = Phase::Checking;
            if !self.grid.find_runs(self.min_run) {
                break;
            }

            self.phase = Phase::Removing;
            tiles_cleared += self.grid.marked_count() as u32;
            self.grid.remove_marked();

            self.phase = Phase::Collapsing;
            self.grid.settle();

            // Settling stacks a column's holes at the top, so feeding row 0
            // and re-settling until refill reports no change leaves the
            // grid completely full.
            self.phase = Phase::Refilling;
            while self.grid.refill_top_row(&mut self.rng) {
                self.grid.settle();
            }

            cascades += 1;
        }
        self.phase = Phase::Idle;

        Resolution {
            swapped: true,
            cascades,
            tiles_cleared,
        }
    }
}

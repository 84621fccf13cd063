//! # Tilematch
//!
//! This library provides the board engine for a match-three tile game:
//! a grid of colored tiles, free swap-on-drop semantics, run detection,
//! cascade removal, gravity, and top-row refill, orchestrated by a
//! convergence state machine that always leaves the grid stable (fully
//! populated, no remaining run).
//!
//! It is used by two binaries:
//! - `play`: interactive terminal play — swap cells and watch cascades.
//! - `simulate`: loads a grid from a text file, applies one swap, and
//!   prints the resolved grid — useful for scripted experiments.
//!
//! ## Modules
//! - `engine`: the grid representation ([`engine::Grid`]), tile types
//!   ([`engine::Tile`]), and the board operations (swap, run marking,
//!   removal, gravity, refill).
//! - `resolver`: the phase machine ([`resolver::MatchEngine`]) that drives
//!   one player swap to a stable grid.
//! - `utils`: parsing grid fixtures from text.

pub mod engine;
pub mod resolver;
pub mod utils;

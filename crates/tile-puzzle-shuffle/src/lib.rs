#![warn(missing_docs)]
//! # tile-puzzle-shuffle
//!
//! ## Purpose
//! Scrambles a puzzle grid into a random, never-solved tile order.
//!
//! ## Responsibilities
//! - Generate a random permutation by fill-by-rejection.
//! - Re-roll until the permutation is not the solved identity.
//! - Designate the hole tile in black-slot mode, or clear the selection.
//!
//! ## Data flow
//! Filter start and "click on a solved puzzle" -> [`Shuffler::shuffle`] ->
//! grid order and selection replaced in place.
//!
//! ## Ownership and lifetimes
//! [`Shuffler`] owns its random generator; callers keep one shuffler per
//! filter instance next to the grid it scrambles.
//!
//! ## Error model
//! Failure to seed from the OS and grid validation failures are surfaced as
//! [`ShuffleError`]. A 1x1 grid cannot be scrambled; it is left solved and the
//! report says so.
//!
//! ## Example
//! ```rust
//! use tile_puzzle_core::{Grid, PuzzleMode};
//! use tile_puzzle_shuffle::Shuffler;
//!
//! let mut grid = Grid::solved(4, 4, PuzzleMode::Classic).unwrap();
//! let report = Shuffler::seeded(7).shuffle(&mut grid).unwrap();
//! assert!(!grid.is_solved());
//! assert!(report.attempts >= 1);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tile_puzzle_core::{CoreError, Grid, PuzzleMode};
use tracing::{debug, warn};

/// Summary of one shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleReport {
    /// Number of permutations generated before an unsolved one came up.
    pub attempts: u32,
    /// Display slot of the hole in black-slot mode.
    pub hole: Option<usize>,
    /// `false` when the grid has a single tile and stays solved.
    pub scrambled: bool,
}

/// Random tile-order generator bound to one random source.
#[derive(Debug, Clone)]
pub struct Shuffler<R = StdRng> {
    rng: R,
}

impl Shuffler<StdRng> {
    /// Seeds a shuffler from operating-system entropy.
    ///
    /// # Errors
    /// Returns [`ShuffleError::Entropy`] when the OS source is unavailable.
    pub fn from_os_rng() -> Result<Self, ShuffleError> {
        let rng =
            StdRng::try_from_os_rng().map_err(|error| ShuffleError::Entropy(error.to_string()))?;
        Ok(Self { rng })
    }

    /// Deterministic shuffler for tests and reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Shuffler<R> {
    /// Wraps an arbitrary random generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Replaces the grid order with a random unsolved permutation and resets
    /// the selection for the grid's mode.
    ///
    /// # Errors
    /// Returns [`ShuffleError::Grid`] when the generated order is rejected by
    /// the grid.
    pub fn shuffle(&mut self, grid: &mut Grid) -> Result<ShuffleReport, ShuffleError> {
        let tile_count = grid.tile_count();
        let scrambled = tile_count > 1;
        if !scrambled {
            warn!(
                rows = grid.rows(),
                cols = grid.cols(),
                "single-tile grid cannot be scrambled"
            );
        }

        let mut attempts = 0_u32;
        loop {
            attempts = attempts.saturating_add(1);
            grid.replace_order(random_order(tile_count, &mut self.rng))?;
            if !grid.is_solved() || !scrambled {
                break;
            }
        }

        let hole = match grid.mode() {
            PuzzleMode::BlackSlot => grid.slot_of_origin(grid.hole_origin()),
            PuzzleMode::Classic => None,
        };
        grid.set_selected(hole);

        debug!(tile_count, attempts, ?hole, "grid shuffled");
        Ok(ShuffleReport {
            attempts,
            hole,
            scrambled,
        })
    }
}

/// Generates a permutation of `0..tile_count` by fill-by-rejection.
///
/// Picks random slots repeatedly; each empty slot found receives the next
/// sequential origin id until all ids are placed.
pub fn random_order<R: Rng + ?Sized>(tile_count: usize, rng: &mut R) -> Vec<usize> {
    let mut slots: Vec<Option<usize>> = vec![None; tile_count];
    let mut next_id = 0;

    while next_id < tile_count {
        let slot = rng.random_range(0..tile_count);
        if slots[slot].is_none() {
            slots[slot] = Some(next_id);
            next_id += 1;
        }
    }

    slots.into_iter().flatten().collect()
}

/// Error type for shuffling.
#[derive(Debug, Error)]
pub enum ShuffleError {
    /// OS entropy could not seed the generator.
    #[error("cannot seed shuffle generator: {0}")]
    Entropy(String),
    /// Grid rejected the generated order.
    #[error("grid rejected shuffled order: {0}")]
    Grid(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for permutation generation.

    use super::*;

    #[test]
    fn random_order_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        for tile_count in [1, 2, 5, 16, 100] {
            let mut order = random_order(tile_count, &mut rng);
            order.sort_unstable();
            assert_eq!(order, (0..tile_count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn same_seed_gives_same_order() {
        let mut first = Grid::solved(4, 4, PuzzleMode::Classic).expect("grid should build");
        let mut second = first.clone();

        Shuffler::seeded(99)
            .shuffle(&mut first)
            .expect("shuffle should succeed");
        Shuffler::seeded(99)
            .shuffle(&mut second)
            .expect("shuffle should succeed");

        assert_eq!(first.order(), second.order());
    }

    #[test]
    fn single_tile_grid_is_left_solved() {
        let mut grid = Grid::solved(1, 1, PuzzleMode::BlackSlot).expect("grid should build");
        let report = Shuffler::seeded(1)
            .shuffle(&mut grid)
            .expect("shuffle should succeed");

        assert!(!report.scrambled);
        assert_eq!(report.attempts, 1);
        assert!(grid.is_solved());
        assert_eq!(grid.selected(), Some(0));
    }
}

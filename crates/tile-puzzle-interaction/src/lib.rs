#![warn(missing_docs)]
//! # tile-puzzle-interaction
//!
//! ## Purpose
//! Turns clicks on the rendered frame into selection changes, tile swaps and
//! reshuffles.
//!
//! ## Responsibilities
//! - Map click coordinates to a display slot.
//! - Apply the selection/adjacency state machine for the grid's mode.
//! - Start a new round when the solved puzzle is clicked.
//!
//! ## Data flow
//! Host click -> [`ClickEvent`] -> [`InteractionController::on_click`] ->
//! grid mutated in place -> [`ClickOutcome`] returned for logging and tests.
//!
//! ## Ownership and lifetimes
//! The controller holds only the adjacency rule. Grid and shuffler are
//! borrowed mutably per click, so the caller decides how they are guarded.
//!
//! ## Error model
//! Every click is either a valid transition or a no-op. The only failure is a
//! reshuffle error, surfaced as [`InteractionError`].
//!
//! ## Example
//! ```rust
//! use tile_puzzle_core::{AdjacencyRule, Grid, PuzzleMode};
//! use tile_puzzle_interaction::{ClickEvent, ClickOutcome, InteractionController};
//! use tile_puzzle_shuffle::Shuffler;
//!
//! let mut grid = Grid::from_order(2, 2, PuzzleMode::Classic, vec![1, 0, 2, 3]).unwrap();
//! let mut shuffler = Shuffler::seeded(1);
//! let controller = InteractionController::new(AdjacencyRule::FourNeighbor);
//!
//! let first = controller.on_click(&mut grid, &mut shuffler, ClickEvent::new(10, 10, 100, 100));
//! assert_eq!(first.unwrap(), ClickOutcome::Selected(0));
//! let second = controller.on_click(&mut grid, &mut shuffler, ClickEvent::new(60, 10, 100, 100));
//! assert!(matches!(second.unwrap(), ClickOutcome::Swapped { solved: true, .. }));
//! ```

use rand::Rng;
use thiserror::Error;
use tile_puzzle_core::{AdjacencyRule, Grid, PuzzleConfig, PuzzleMode};
use tile_puzzle_shuffle::{ShuffleError, ShuffleReport, Shuffler};
use tracing::debug;

/// Click at pixel coordinates inside a rendered frame of the given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Horizontal pixel coordinate.
    pub x: u32,
    /// Vertical pixel coordinate.
    pub y: u32,
    /// Width of the frame the click landed on.
    pub frame_width: u32,
    /// Height of the frame the click landed on.
    pub frame_height: u32,
}

impl ClickEvent {
    /// Creates a click event.
    pub fn new(x: u32, y: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            x,
            y,
            frame_width,
            frame_height,
        }
    }
}

/// Result of processing one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click landed outside the frame; nothing changed.
    OutsideFrame,
    /// Puzzle was solved; a new round was shuffled.
    Reshuffled(ShuffleReport),
    /// Slot became the selection.
    Selected(usize),
    /// Selected slot was clicked again and released.
    Deselected(usize),
    /// Tiles at `from` (the previous selection) and `to` were exchanged.
    Swapped {
        /// Previously selected slot.
        from: usize,
        /// Clicked slot.
        to: usize,
        /// Whether the swap completed the puzzle.
        solved: bool,
    },
    /// Clicked slot is not a neighbour of the selection; nothing changed.
    NotAdjacent {
        /// Current selection.
        selected: usize,
        /// Clicked slot.
        clicked: usize,
    },
}

/// Selection/swap state machine parameterized by an adjacency rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionController {
    adjacency: AdjacencyRule,
}

impl InteractionController {
    /// Creates a controller using `adjacency` to decide legal swaps.
    pub fn new(adjacency: AdjacencyRule) -> Self {
        Self { adjacency }
    }

    /// Creates a controller from puzzle configuration.
    pub fn from_config(config: &PuzzleConfig) -> Self {
        Self::new(config.adjacency)
    }

    /// Adjacency rule in use.
    pub fn adjacency(&self) -> AdjacencyRule {
        self.adjacency
    }

    /// Applies one click to `grid`.
    ///
    /// Rules, first match wins:
    /// 1. Solved puzzle: reshuffle, no tile interaction.
    /// 2. Nothing selected: select the clicked slot.
    /// 3. Classic mode, selected slot clicked again: deselect.
    /// 4. Clicked slot neighbours the selection: swap. Black-slot mode moves
    ///    the hole marker to the clicked slot; classic mode clears it.
    /// 5. Anything else: no change.
    ///
    /// # Errors
    /// Returns [`InteractionError::Shuffle`] when a reshuffle fails.
    pub fn on_click<R: Rng>(
        &self,
        grid: &mut Grid,
        shuffler: &mut Shuffler<R>,
        event: ClickEvent,
    ) -> Result<ClickOutcome, InteractionError> {
        let Some(clicked) = slot_at(grid, event) else {
            return Ok(ClickOutcome::OutsideFrame);
        };

        let outcome = if grid.is_solved() {
            ClickOutcome::Reshuffled(shuffler.shuffle(grid)?)
        } else {
            self.apply_tile_click(grid, clicked)
        };

        debug!(clicked, ?outcome, "click applied");
        Ok(outcome)
    }

    fn apply_tile_click(&self, grid: &mut Grid, clicked: usize) -> ClickOutcome {
        let Some(selected) = grid.selected() else {
            grid.set_selected(Some(clicked));
            return ClickOutcome::Selected(clicked);
        };

        if selected == clicked && grid.mode() == PuzzleMode::Classic {
            grid.set_selected(None);
            return ClickOutcome::Deselected(clicked);
        }

        if !are_adjacent(self.adjacency, grid.cols(), selected, clicked) {
            return ClickOutcome::NotAdjacent { selected, clicked };
        }

        grid.swap(selected, clicked);
        let next_selection = match grid.mode() {
            PuzzleMode::BlackSlot => Some(clicked),
            PuzzleMode::Classic => None,
        };
        grid.set_selected(next_selection);

        ClickOutcome::Swapped {
            from: selected,
            to: clicked,
            solved: grid.is_solved(),
        }
    }
}

/// Display slot under a click, or `None` when the click is outside the frame.
///
/// `slot = cols * floor(rows * y / height) + floor(cols * x / width)`.
pub fn slot_at(grid: &Grid, event: ClickEvent) -> Option<usize> {
    if event.x >= event.frame_width || event.y >= event.frame_height {
        return None;
    }

    let rows = u64::from(grid.rows());
    let cols = u64::from(grid.cols());
    let row = rows * u64::from(event.y) / u64::from(event.frame_height);
    let col = cols * u64::from(event.x) / u64::from(event.frame_width);

    usize::try_from(row * cols + col).ok()
}

/// Returns `true` when display slots `a` and `b` are neighbours under `rule`
/// on a grid with `cols` columns.
pub fn are_adjacent(rule: AdjacencyRule, cols: u32, a: usize, b: usize) -> bool {
    let cols = cols as usize;
    match rule {
        AdjacencyRule::FourNeighbor => {
            let (row_a, col_a) = (a / cols, a % cols);
            let (row_b, col_b) = (b / cols, b % cols);
            (row_a == row_b && col_a.abs_diff(col_b) == 1)
                || (col_a == col_b && row_a.abs_diff(row_b) == 1)
        }
        AdjacencyRule::RowWrap => a.abs_diff(b) == 1 || a.abs_diff(b) == cols,
    }
}

/// Error type for click handling.
#[derive(Debug, Error)]
pub enum InteractionError {
    /// Starting a new round failed.
    #[error("reshuffle failed: {0}")]
    Shuffle(#[from] ShuffleError),
}

//! Puzzle grid: dimensions, tile permutation and current selection.

use crate::config::{PuzzleConfig, PuzzleMode, check_dimension};
use crate::CoreError;

/// Tile grid with a display-slot to origin-slot permutation.
///
/// `order()[display] == origin`: the tile shown at `display` was cut from
/// `origin` in the unscrambled picture. Slots are numbered row-major,
/// `row * cols + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    mode: PuzzleMode,
    order: Vec<usize>,
    selected: Option<usize>,
}

impl Grid {
    /// Creates a solved grid (identity order, nothing selected).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] when `rows` or `cols` is outside
    /// `1..=128`.
    pub fn solved(rows: u32, cols: u32, mode: PuzzleMode) -> Result<Self, CoreError> {
        check_dimension("rows", rows)?;
        check_dimension("cols", cols)?;

        let tile_count = rows as usize * cols as usize;
        Ok(Self {
            rows,
            cols,
            mode,
            order: (0..tile_count).collect(),
            selected: None,
        })
    }

    /// Creates a solved grid from validated configuration.
    ///
    /// # Errors
    /// Same as [`Grid::solved`].
    pub fn from_config(config: &PuzzleConfig) -> Result<Self, CoreError> {
        Self::solved(config.rows, config.cols, config.mode())
    }

    /// Creates a grid with an explicit tile order.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] for bad dimensions and
    /// [`CoreError::NotAPermutation`] when `order` is not a permutation of
    /// `0..rows*cols`.
    pub fn from_order(
        rows: u32,
        cols: u32,
        mode: PuzzleMode,
        order: Vec<usize>,
    ) -> Result<Self, CoreError> {
        let mut grid = Self::solved(rows, cols, mode)?;
        grid.replace_order(order)?;
        Ok(grid)
    }

    /// Row count.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of tiles (`rows * cols`).
    pub fn tile_count(&self) -> usize {
        self.order.len()
    }

    /// Mode fixed at construction.
    pub fn mode(&self) -> PuzzleMode {
        self.mode
    }

    /// Current display-to-origin permutation.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Origin slot of the tile shown at `display`.
    ///
    /// # Panics
    /// Panics when `display >= tile_count()`.
    pub fn origin_of(&self, display: usize) -> usize {
        self.order[display]
    }

    /// Selected display slot, or the hole in black-slot mode.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Sets or clears the selected display slot.
    pub fn set_selected(&mut self, selected: Option<usize>) {
        debug_assert!(
            selected.is_none_or(|slot| slot < self.tile_count()),
            "selected slot out of range"
        );
        self.selected = selected;
    }

    /// Returns `true` when every display slot shows its own origin tile.
    pub fn is_solved(&self) -> bool {
        self.order
            .iter()
            .enumerate()
            .all(|(display, origin)| display == *origin)
    }

    /// Exchanges the origin tiles shown at two display slots.
    ///
    /// Adjacency is not checked here; that is the interaction controller's job.
    ///
    /// # Panics
    /// Panics when either slot is out of range.
    pub fn swap(&mut self, slot_a: usize, slot_b: usize) {
        debug_assert!(slot_a < self.tile_count() && slot_b < self.tile_count());
        self.order.swap(slot_a, slot_b);
    }

    /// Replaces the whole tile order.
    ///
    /// # Errors
    /// Returns [`CoreError::NotAPermutation`] and leaves the grid untouched when
    /// `order` has the wrong length, duplicates, or out-of-range values.
    pub fn replace_order(&mut self, order: Vec<usize>) -> Result<(), CoreError> {
        let tile_count = self.rows as usize * self.cols as usize;
        if !is_permutation(&order, tile_count) {
            return Err(CoreError::NotAPermutation { tile_count });
        }

        self.order = order;
        Ok(())
    }

    /// Returns `true` while the order is a bijection on `0..tile_count()`.
    pub fn is_permutation(&self) -> bool {
        is_permutation(&self.order, self.rows as usize * self.cols as usize)
    }

    /// Display slot currently showing `origin`.
    pub fn slot_of_origin(&self, origin: usize) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == origin)
    }

    /// Origin id of the tile that becomes the hole in black-slot mode.
    ///
    /// Computed as `(cols - 1) * rows`; on square grids this is the first tile
    /// of the last row.
    pub fn hole_origin(&self) -> usize {
        (self.cols as usize - 1) * self.rows as usize
    }

    /// `(row, col)` of a display slot.
    pub fn position(&self, slot: usize) -> (usize, usize) {
        let cols = self.cols as usize;
        (slot / cols, slot % cols)
    }
}

fn is_permutation(order: &[usize], tile_count: usize) -> bool {
    if order.len() != tile_count {
        return false;
    }

    let mut seen = vec![false; tile_count];
    for origin in order {
        match seen.get_mut(*origin) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }

    true
}

//! Puzzle configuration read once when a filter instance is created.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Smallest accepted row or column count.
pub const MIN_DIMENSION: u32 = 1;
/// Largest accepted row or column count.
pub const MAX_DIMENSION: u32 = 128;
/// Row count used when configuration omits it.
pub const DEFAULT_ROWS: u32 = 4;
/// Column count used when configuration omits it.
pub const DEFAULT_COLS: u32 = 4;

/// Interaction and rendering mode, fixed for the lifetime of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleMode {
    /// Pick any tile, then click a neighbour to swap the two.
    Classic,
    /// One tile is a permanently selected hole that neighbours slide into.
    BlackSlot,
}

/// Rule deciding whether two display slots are neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjacencyRule {
    /// Left/right within the same row, or up/down within the same column.
    #[default]
    FourNeighbor,
    /// Legacy rule: any slot index differing by 1 or by `cols`, so the last
    /// slot of a row neighbours the first slot of the next row.
    RowWrap,
}

/// Validated puzzle configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PuzzleConfig {
    /// Grid row count (`1..=128`).
    pub rows: u32,
    /// Grid column count (`1..=128`).
    pub cols: u32,
    /// Enables the hole/black-tile mode.
    pub black_slot: bool,
    /// Adjacency rule used by the interaction controller.
    pub adjacency: AdjacencyRule,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            black_slot: false,
            adjacency: AdjacencyRule::default(),
        }
    }
}

impl PuzzleConfig {
    /// Creates validated configuration with the default adjacency rule.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] when `rows` or `cols` is outside
    /// `1..=128`.
    pub fn new(rows: u32, cols: u32, black_slot: bool) -> Result<Self, CoreError> {
        let config = Self {
            rows,
            cols,
            black_slot,
            adjacency: AdjacencyRule::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy using `adjacency` instead of the current rule.
    pub fn with_adjacency(mut self, adjacency: AdjacencyRule) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Checks dimension ranges.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] for the first offending axis.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_dimension("rows", self.rows)?;
        check_dimension("cols", self.cols)
    }

    /// Decodes and validates configuration from JSON bytes.
    ///
    /// Missing keys fall back to their defaults; unknown keys are rejected.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] on malformed JSON and
    /// [`CoreError::InvalidDimension`] on out-of-range values.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_slice(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Mode selected by the `black_slot` flag.
    pub fn mode(&self) -> PuzzleMode {
        if self.black_slot {
            PuzzleMode::BlackSlot
        } else {
            PuzzleMode::Classic
        }
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

pub(crate) fn check_dimension(axis: &'static str, value: u32) -> Result<(), CoreError> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        return Ok(());
    }

    Err(CoreError::InvalidDimension {
        axis,
        value,
        min: MIN_DIMENSION,
        max: MAX_DIMENSION,
    })
}

#![warn(missing_docs)]
//! # tile-puzzle-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `tile-puzzle` workspace.
//!
//! ## Responsibilities
//! - Represent the puzzle grid and its display-to-origin permutation.
//! - Validate puzzle configuration (rows, columns, black-slot mode).
//! - Represent planar pictures and bounds-checked block operations on planes.
//!
//! ## Data flow
//! Configuration produces a [`Grid`]. The shuffle engine and interaction
//! controller mutate the grid; the compositor reads it together with source
//! and destination [`Picture`] values.
//!
//! ## Ownership and lifetimes
//! Grids and pictures own their buffers (`Vec`) so a filter instance can hand
//! a cloned grid snapshot to the render path without borrowing shared state.
//!
//! ## Error model
//! Validation failures (dimension range, non-permutations, plane shapes, block
//! bounds) return [`CoreError`]. Out-of-range slot indices passed to
//! [`Grid::swap`] are programming errors and panic.
//!
//! ## Example
//! ```rust
//! use tile_puzzle_core::{Grid, PuzzleMode};
//!
//! let mut grid = Grid::from_order(2, 2, PuzzleMode::Classic, vec![1, 0, 3, 2]).unwrap();
//! assert!(!grid.is_solved());
//! grid.swap(0, 1);
//! grid.swap(2, 3);
//! assert!(grid.is_solved());
//! ```

mod config;
mod grid;
mod picture;

use thiserror::Error;

pub use config::{
    AdjacencyRule, DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION, MIN_DIMENSION, PuzzleConfig,
    PuzzleMode,
};
pub use grid::Grid;
pub use picture::{BlockLayout, BlockRect, LUMA_PLANE, Picture, PictureFormat, Plane, PlaneFormat};

/// Error type for core model validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Row or column count is outside the supported range.
    #[error("invalid {axis} count {value}: must be within {min}..={max}")]
    InvalidDimension {
        /// Axis name (`rows` or `cols`).
        axis: &'static str,
        /// Rejected value.
        value: u32,
        /// Inclusive minimum.
        min: u32,
        /// Inclusive maximum.
        max: u32,
    },
    /// Tile order is not a permutation of `0..rows*cols`.
    #[error("tile order is not a permutation of 0..{tile_count}")]
    NotAPermutation {
        /// Expected tile count.
        tile_count: usize,
    },
    /// Plane buffer does not match its declared geometry.
    #[error("invalid plane shape: {0}")]
    InvalidPlaneShape(String),
    /// A block rectangle does not fit inside its plane.
    #[error(
        "block {x},{y} {width}x{height} exceeds plane of {plane_width} bytes x {plane_lines} lines"
    )]
    BlockOutOfBounds {
        /// Left byte offset of the block.
        x: usize,
        /// Top line of the block.
        y: usize,
        /// Block width in bytes.
        width: usize,
        /// Block height in lines.
        height: usize,
        /// Visible plane width in bytes.
        plane_width: usize,
        /// Plane line count.
        plane_lines: usize,
    },
    /// JSON decoding error.
    #[error("config codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

//! Shared fixtures for interaction integration tests.

use tile_puzzle_core::Grid;
use tile_puzzle_interaction::ClickEvent;

/// Frame size used by click fixtures: 100 pixels per grid cell.
#[allow(dead_code)]
pub const CELL_PIXELS: u32 = 100;

/// Click landing in the middle of `slot` on a frame sized for `grid`.
#[allow(dead_code)]
pub fn click_on(grid: &Grid, slot: usize) -> ClickEvent {
    let (row, col) = grid.position(slot);
    ClickEvent::new(
        col as u32 * CELL_PIXELS + CELL_PIXELS / 2,
        row as u32 * CELL_PIXELS + CELL_PIXELS / 2,
        grid.cols() * CELL_PIXELS,
        grid.rows() * CELL_PIXELS,
    )
}

/// Order with every tile displaced by one slot, so no tile is home.
#[allow(dead_code)]
pub fn rotated_order(tile_count: usize) -> Vec<usize> {
    (0..tile_count)
        .map(|slot| (slot + 1) % tile_count)
        .collect()
}

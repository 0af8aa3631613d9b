//! Shared fixtures for filter integration tests.

use tile_puzzle_core::{BlockLayout, Picture, PictureFormat, Plane, PuzzleConfig};
use tile_puzzle_filter::{MemoryOutput, MemoryOutputFactory, PuzzleFilter};
use tile_puzzle_shuffle::Shuffler;

/// Pixels per block edge in sentinel fixtures.
#[allow(dead_code)]
pub const BLOCK_PIXELS: usize = 8;

/// Opens a deterministic filter on an in-memory output.
#[allow(dead_code)]
pub fn open_filter(
    config: PuzzleConfig,
    format: PictureFormat,
    buffers: usize,
    seed: u64,
) -> PuzzleFilter<MemoryOutput> {
    PuzzleFilter::open_with_shuffler(
        config,
        format,
        &MemoryOutputFactory::new(buffers),
        Shuffler::seeded(seed),
    )
    .expect("filter fixture should open")
}

/// Gray picture of `rows x cols` blocks, each filled with `sentinel(slot)`.
#[allow(dead_code)]
pub fn sentinel_picture(rows: usize, cols: usize, date: i64) -> (PictureFormat, Picture) {
    let format = PictureFormat::gray8((cols * BLOCK_PIXELS) as u32, (rows * BLOCK_PIXELS) as u32);
    let mut plane = Plane::new(format.planes[0]).expect("plane fixture should be valid");
    let layout = BlockLayout::for_plane(format.planes[0], rows, cols);
    for slot in 0..rows * cols {
        plane
            .fill_block(layout.slot_rect(slot), sentinel(slot))
            .expect("fill should succeed");
    }
    (format, Picture::new(vec![plane], date))
}

/// Sentinel byte for origin `slot`.
#[allow(dead_code)]
pub fn sentinel(slot: usize) -> u8 {
    (slot + 1) as u8
}

/// Value at the centre of each block, in display-slot order.
#[allow(dead_code)]
pub fn block_centres(picture: &Picture, rows: usize, cols: usize) -> Vec<u8> {
    let plane = &picture.planes()[0];
    let layout = BlockLayout::for_plane(plane.format(), rows, cols);
    (0..rows * cols)
        .map(|slot| {
            let rect = layout.slot_rect(slot);
            plane
                .get(rect.x + rect.width / 2, rect.y + rect.height / 2)
                .expect("centre should be inside the plane")
        })
        .collect()
}

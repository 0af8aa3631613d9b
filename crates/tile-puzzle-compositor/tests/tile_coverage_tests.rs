//! Integration tests for full-coverage tile remapping.

use tile_puzzle_compositor::compose_tiles;
use tile_puzzle_core::{
    BlockLayout, Grid, Picture, PictureFormat, Plane, PlaneFormat, PuzzleMode,
};
use tile_puzzle_shuffle::Shuffler;

/// Fills each block of every plane with a sentinel unique to its origin slot.
fn sentinel_picture(format: &PictureFormat, rows: usize, cols: usize) -> Picture {
    let planes = format
        .planes
        .iter()
        .enumerate()
        .map(|(plane_index, plane_format)| {
            let mut plane = Plane::new(*plane_format).expect("plane should be valid");
            let layout = BlockLayout::for_plane(*plane_format, rows, cols);
            for slot in 0..rows * cols {
                let sentinel = sentinel_for(plane_index, slot);
                plane
                    .fill_block(layout.slot_rect(slot), sentinel)
                    .expect("fill should succeed");
            }
            plane
        })
        .collect();
    Picture::new(planes, 40_000)
}

fn sentinel_for(plane_index: usize, slot: usize) -> u8 {
    (10 + plane_index * 60 + slot) as u8
}

#[test]
fn tile_coverage_tests_two_by_two_grid_on_four_by_four_plane() {
    let format = PictureFormat::gray8(4, 4);
    let source = sentinel_picture(&format, 2, 2);
    let mut destination = Picture::blank(&format, 0).expect("picture should build");
    let grid = Grid::from_order(2, 2, PuzzleMode::Classic, vec![2, 0, 3, 1])
        .expect("order should be a permutation");

    compose_tiles(&source, &mut destination, &grid).expect("compose should succeed");

    let plane = &destination.planes()[0];
    let expected: [[u8; 4]; 4] = [
        [12, 12, 10, 10],
        [12, 12, 10, 10],
        [13, 13, 11, 11],
        [13, 13, 11, 11],
    ];
    for (y, row) in expected.iter().enumerate() {
        assert_eq!(plane.line(y).expect("line should exist"), row);
    }
}

#[test]
fn tile_coverage_tests_every_block_matches_its_origin_on_all_planes() {
    let (rows, cols) = (4_u32, 6_u32);
    let format = PictureFormat::i420(48, 32);
    let source = sentinel_picture(&format, rows as usize, cols as usize);
    let mut destination = Picture::blank(&format, 0).expect("picture should build");
    let mut grid = Grid::solved(rows, cols, PuzzleMode::Classic).expect("grid should build");
    Shuffler::seeded(5)
        .shuffle(&mut grid)
        .expect("shuffle should succeed");

    compose_tiles(&source, &mut destination, &grid).expect("compose should succeed");

    for (plane_index, plane) in destination.planes().iter().enumerate() {
        let layout = BlockLayout::for_plane(plane.format(), rows as usize, cols as usize);
        for display in 0..grid.tile_count() {
            let rect = layout.slot_rect(display);
            let expected = sentinel_for(plane_index, grid.origin_of(display));
            for y in rect.y..rect.y + rect.height {
                let line = plane.line(y).expect("line should exist");
                assert!(
                    line[rect.x..rect.x + rect.width]
                        .iter()
                        .all(|value| *value == expected),
                    "plane {plane_index} slot {display} line {y} has foreign pixels"
                );
            }
        }
    }
}

#[test]
fn tile_coverage_tests_respects_padded_pitch() {
    let padded = PlaneFormat {
        pitch: 12,
        lines: 4,
        visible_pitch: 8,
    };
    let format = PictureFormat {
        width: 8,
        height: 4,
        planes: vec![padded],
    };
    let source = sentinel_picture(&format, 2, 2);
    let mut destination = Picture::blank(&format, 0).expect("picture should build");
    let grid = Grid::from_order(2, 2, PuzzleMode::Classic, vec![3, 2, 1, 0])
        .expect("order should be a permutation");

    compose_tiles(&source, &mut destination, &grid).expect("compose should succeed");

    let plane = &destination.planes()[0];
    assert_eq!(
        plane.line(0).expect("line should exist"),
        &[13, 13, 13, 13, 12, 12, 12, 12]
    );
    assert_eq!(
        plane.line(3).expect("line should exist"),
        &[11, 11, 11, 11, 10, 10, 10, 10]
    );
    assert!(plane.pixels()[8..12].iter().all(|value| *value == 0));
}

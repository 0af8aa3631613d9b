#![warn(missing_docs)]
//! # tile-puzzle-compositor
//!
//! ## Purpose
//! Renders one scrambled output picture from a source picture and the current
//! puzzle grid.
//!
//! ## Responsibilities
//! - Split every plane into `rows x cols` blocks sized for that plane.
//! - Copy each tile from its origin block to its display block.
//! - Blank the hole in black-slot mode and outline the selection otherwise.
//!
//! ## Data flow
//! Source [`Picture`] + grid snapshot -> [`compose_tiles`] -> destination
//! [`Picture`] handed to the output collaborator.
//!
//! ## Ownership and lifetimes
//! The compositor borrows both pictures and the grid for one call and keeps no
//! state between frames.
//!
//! ## Error model
//! Empty pictures and source/destination layout mismatches fail with
//! [`CompositorError`] before any byte is written.
//!
//! ## Notes
//! Composition never alters tile content; it only moves whole blocks. Bytes
//! left over when a plane does not divide evenly by the grid are not written.

use thiserror::Error;
use tile_puzzle_core::{BlockLayout, CoreError, Grid, LUMA_PLANE, Picture, PuzzleMode};

/// Fill value for the hole on the luma plane.
pub const BLACK_LUMA: u8 = 0x00;
/// Fill value for the hole on chroma planes (neutral gray).
pub const BLACK_CHROMA: u8 = 0x80;
/// Luma value of the selection border.
pub const HIGHLIGHT_LUMA: u8 = 0xff;

/// Neutral fill byte for the plane at `plane_index`.
pub fn neutral_fill(plane_index: usize) -> u8 {
    if plane_index == LUMA_PLANE {
        BLACK_LUMA
    } else {
        BLACK_CHROMA
    }
}

/// Writes the scrambled view of `source` into `destination`.
///
/// # Parameters
/// - `source`: Unscrambled input picture.
/// - `destination`: Output picture with the same plane layout as `source`.
/// - `grid`: Tile order and selection to render.
///
/// # Errors
/// Returns [`CompositorError::NoPlanes`] for a picture without planes and
/// [`CompositorError::GeometryMismatch`] when the plane layouts differ.
pub fn compose_tiles(
    source: &Picture,
    destination: &mut Picture,
    grid: &Grid,
) -> Result<(), CompositorError> {
    if source.planes().is_empty() {
        return Err(CompositorError::NoPlanes);
    }
    if !source.same_layout(destination) {
        return Err(CompositorError::GeometryMismatch {
            source_planes: source.planes().len(),
            destination_planes: destination.planes().len(),
        });
    }

    let rows = grid.rows() as usize;
    let cols = grid.cols() as usize;
    let hole = match grid.mode() {
        PuzzleMode::BlackSlot => grid.selected(),
        PuzzleMode::Classic => None,
    };

    for (plane_index, (input, output)) in source
        .planes()
        .iter()
        .zip(destination.planes_mut().iter_mut())
        .enumerate()
    {
        // Chroma planes may be subsampled, so block size is per plane.
        let layout = BlockLayout::for_plane(input.format(), rows, cols);

        for (display, origin) in grid.order().iter().enumerate() {
            let target = layout.slot_rect(display);
            if hole == Some(display) {
                output.fill_block(target, neutral_fill(plane_index))?;
            } else {
                output.copy_block_from(input, layout.slot_rect(*origin), target)?;
            }
        }
    }

    if grid.mode() == PuzzleMode::Classic
        && let Some(selected) = grid.selected()
        && let Some(luma) = destination.planes_mut().get_mut(LUMA_PLANE)
    {
        let layout = BlockLayout::for_plane(luma.format(), rows, cols);
        luma.outline_block(layout.slot_rect(selected), HIGHLIGHT_LUMA)?;
    }

    Ok(())
}

/// Error type for frame composition.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// Source picture has no planes.
    #[error("picture has no planes")]
    NoPlanes,
    /// Source and destination plane layouts differ.
    #[error(
        "source ({source_planes} planes) and destination ({destination_planes} planes) layouts differ"
    )]
    GeometryMismatch {
        /// Source plane count.
        source_planes: usize,
        /// Destination plane count.
        destination_planes: usize,
    },
    /// A block operation failed on a plane.
    #[error("block operation failed: {0}")]
    Block(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for hole and selection rendering.

    use tile_puzzle_core::{PictureFormat, Plane, PlaneFormat};

    use super::*;

    fn gradient_picture(format: &PictureFormat) -> Picture {
        let planes = format
            .planes
            .iter()
            .map(|plane| {
                let len = plane.pitch * plane.lines;
                let pixels = (0..len).map(|value| (value % 100) as u8 + 1).collect();
                Plane::from_pixels(*plane, pixels).expect("plane should be valid")
            })
            .collect();
        Picture::new(planes, 0)
    }

    #[test]
    fn hole_is_black_on_luma_and_gray_on_chroma() {
        let format = PictureFormat::i420(8, 8);
        let source = gradient_picture(&format);
        let mut destination = Picture::blank(&format, 0).expect("picture should build");
        let mut grid = Grid::from_order(2, 2, PuzzleMode::BlackSlot, vec![3, 2, 1, 0])
            .expect("order should be a permutation");
        grid.set_selected(Some(1));

        compose_tiles(&source, &mut destination, &grid).expect("compose should succeed");

        let luma = &destination.planes()[0];
        for y in 0..4 {
            assert_eq!(&luma.line(y).expect("luma line")[4..8], &[0, 0, 0, 0]);
        }
        let chroma = &destination.planes()[1];
        for y in 0..2 {
            assert_eq!(&chroma.line(y).expect("chroma line")[2..4], &[128, 128]);
        }
    }

    #[test]
    fn selection_outline_touches_only_luma() {
        let format = PictureFormat::i420(8, 8);
        let source = gradient_picture(&format);
        let mut destination = Picture::blank(&format, 0).expect("picture should build");
        let mut grid = Grid::from_order(2, 2, PuzzleMode::Classic, vec![1, 0, 2, 3])
            .expect("order should be a permutation");
        grid.set_selected(Some(3));

        compose_tiles(&source, &mut destination, &grid).expect("compose should succeed");

        let luma = &destination.planes()[0];
        assert_eq!(&luma.line(4).expect("luma line")[4..8], &[255, 255, 255, 255]);
        assert_eq!(luma.get(4, 5), Some(255));
        assert_eq!(luma.get(7, 5), Some(255));
        assert_eq!(luma.get(5, 5), source.planes()[0].get(5, 5));

        let chroma_source = &source.planes()[1];
        let chroma = &destination.planes()[1];
        assert_eq!(chroma.line(3), chroma_source.line(3));
    }

    #[test]
    fn mismatched_layouts_are_rejected() {
        let source = gradient_picture(&PictureFormat::i420(8, 8));
        let mut destination =
            Picture::blank(&PictureFormat::gray8(8, 8), 0).expect("picture should build");
        let grid = Grid::solved(2, 2, PuzzleMode::Classic).expect("grid should build");

        assert!(matches!(
            compose_tiles(&source, &mut destination, &grid),
            Err(CompositorError::GeometryMismatch {
                source_planes: 3,
                destination_planes: 1
            })
        ));
    }

    #[test]
    fn uneven_division_leaves_remainder_untouched() {
        let format = PictureFormat {
            width: 5,
            height: 5,
            planes: vec![PlaneFormat::packed(5, 5)],
        };
        let source = gradient_picture(&format);
        let mut destination = Picture::blank(&format, 0).expect("picture should build");
        let grid = Grid::solved(2, 2, PuzzleMode::Classic).expect("grid should build");

        compose_tiles(&source, &mut destination, &grid).expect("compose should succeed");

        let plane = &destination.planes()[0];
        assert_eq!(plane.line(4).expect("last line"), &[0, 0, 0, 0, 0]);
        assert_eq!(plane.get(4, 0), Some(0));
        assert_eq!(plane.get(3, 3), source.planes()[0].get(3, 3));
    }
}

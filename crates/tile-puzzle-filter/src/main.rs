#![warn(missing_docs)]
//! # tile-puzzle-filter binary
//!
//! Headless demo: opens a filter on an in-memory output, renders a synthetic
//! clip, and replays a few clicks while logging every transition.

use std::process::ExitCode;

use tile_puzzle_core::PictureFormat;
use tile_puzzle_filter::{
    FilterError, MemoryOutputFactory, PointerEvent, PuzzleFilter, app_version, config_from_env,
    synthetic_picture,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEMO_WIDTH: u32 = 320;
const DEMO_HEIGHT: u32 = 240;
const DEMO_FRAMES: i64 = 25;
const FRAME_DURATION_US: i64 = 40_000;
const OUTPUT_BUFFERS: usize = 3;

/// CLI entry point.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(demo_error) => {
            error!(error = %demo_error, "tile-puzzle demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), FilterError> {
    info!(version = app_version(), "tile-puzzle-filter starting");

    let config = config_from_env()?;
    let format = PictureFormat::i420(DEMO_WIDTH, DEMO_HEIGHT);
    let filter = PuzzleFilter::open(
        config,
        format.clone(),
        &MemoryOutputFactory::new(OUTPUT_BUFFERS),
    )?;

    let cell_width = DEMO_WIDTH / config.cols;
    let cell_height = DEMO_HEIGHT / config.rows;
    let mut displayed = 0_usize;

    for frame in 0..DEMO_FRAMES {
        let source = synthetic_picture(&format, frame * FRAME_DURATION_US)?;
        filter.render(&source)?;
        displayed += filter
            .output()
            .take_displayed()
            .map_err(FilterError::Output)?
            .len();

        // Walk the pointer across the first row, clicking every other frame.
        let column = (frame as u32 / 2) % config.cols;
        filter.on_pointer_event(PointerEvent::Moved {
            x: column * cell_width + cell_width / 2,
            y: cell_height / 2,
        })?;
        if frame % 2 == 1
            && let Some(outcome) = filter.on_pointer_event(PointerEvent::Clicked)?
        {
            info!(frame, ?outcome, "click replayed");
        }
    }

    let grid = filter.grid_snapshot()?;
    info!(
        displayed,
        solved = grid.is_solved(),
        order = ?grid.order(),
        "demo finished"
    );
    filter.close();
    Ok(())
}

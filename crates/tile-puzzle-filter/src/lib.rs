#![warn(missing_docs)]
//! # tile-puzzle-filter
//!
//! ## Purpose
//! Runs one puzzle filter instance: owns the grid, renders scrambled frames,
//! and applies clicks coming from another thread.
//!
//! ## Responsibilities
//! - Build the grid from configuration and shuffle it on open.
//! - Serialize the render path and the click path through one lock.
//! - Acquire destination pictures with bounded backoff until available or
//!   the filter is closed.
//! - Read configuration from an optional JSON file and environment
//!   variables.
//!
//! ## Data flow
//! Source picture -> [`PuzzleFilter::render`] -> grid snapshot -> compositor
//! -> [`PictureOutput::display`]. Clicks -> [`PuzzleFilter::on_click`] ->
//! interaction controller -> grid mutated under the lock.
//!
//! ## Ownership and lifetimes
//! The filter owns its output and its state. All entry points take `&self`,
//! so hosts share one instance between threads with `Arc`.
//!
//! ## Error model
//! Construction failures (configuration, entropy, output open) and render
//! failures (output errors, layout mismatches) are wrapped in [`FilterError`].
//! Running out of output buffers is not an error; render waits.

mod output;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tile_puzzle_compositor::{CompositorError, compose_tiles};
use tile_puzzle_core::{
    AdjacencyRule, CoreError, Grid, LUMA_PLANE, Picture, PictureFormat, PuzzleConfig,
};
use tile_puzzle_interaction::{ClickEvent, ClickOutcome, InteractionController, InteractionError};
use tile_puzzle_shuffle::{ShuffleError, Shuffler};
use tracing::{debug, error, info, warn};

pub use output::{MemoryOutput, MemoryOutputFactory, OutputError, OutputFactory, PictureOutput};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("TILE_PUZZLE_VERSION");

/// Environment variable naming a JSON configuration file.
pub const ENV_CONFIG_FILE: &str = "TILE_PUZZLE_CONFIG";
/// Environment variable overriding the row count.
pub const ENV_ROWS: &str = "TILE_PUZZLE_ROWS";
/// Environment variable overriding the column count.
pub const ENV_COLS: &str = "TILE_PUZZLE_COLS";
/// Environment variable enabling black-slot mode.
pub const ENV_BLACK_SLOT: &str = "TILE_PUZZLE_BLACK_SLOT";
/// Environment variable selecting the adjacency rule.
pub const ENV_ADJACENCY: &str = "TILE_PUZZLE_ADJACENCY";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Backoff used while waiting for a free output picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Sleep before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single sleep.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        }
    }
}

impl RetryPolicy {
    /// Sleep before retry number `attempt` (zero-based): doubles each time,
    /// capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1_u32 << attempt.min(16);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Pointer events as delivered by a windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer moved to pixel `(x, y)` of the output frame.
    Moved {
        /// Horizontal pixel coordinate.
        x: u32,
        /// Vertical pixel coordinate.
        y: u32,
    },
    /// Button clicked at the last known pointer position.
    Clicked,
}

#[derive(Debug)]
struct PuzzleState {
    grid: Grid,
    shuffler: Shuffler,
    pointer: Option<(u32, u32)>,
}

/// One running puzzle filter instance.
#[derive(Debug)]
pub struct PuzzleFilter<O: PictureOutput> {
    config: PuzzleConfig,
    format: PictureFormat,
    controller: InteractionController,
    retry: RetryPolicy,
    state: Mutex<PuzzleState>,
    output: O,
    closing: AtomicBool,
}

impl<O: PictureOutput> PuzzleFilter<O> {
    /// Opens a filter instance seeded from OS entropy.
    ///
    /// # Errors
    /// Returns [`FilterError::Config`] for invalid configuration,
    /// [`FilterError::Shuffle`] when seeding fails, and
    /// [`FilterError::OutputOpen`] when the output cannot be created.
    pub fn open<F>(
        config: PuzzleConfig,
        format: PictureFormat,
        factory: &F,
    ) -> Result<Self, FilterError>
    where
        F: OutputFactory<Output = O>,
    {
        let shuffler = Shuffler::from_os_rng()?;
        Self::open_with_shuffler(config, format, factory, shuffler)
    }

    /// Opens a filter instance with a caller-provided shuffler.
    ///
    /// # Errors
    /// Same as [`PuzzleFilter::open`], minus seeding.
    pub fn open_with_shuffler<F>(
        config: PuzzleConfig,
        format: PictureFormat,
        factory: &F,
        mut shuffler: Shuffler,
    ) -> Result<Self, FilterError>
    where
        F: OutputFactory<Output = O>,
    {
        config.validate().map_err(FilterError::Config)?;
        let mut grid = Grid::from_config(&config).map_err(FilterError::Config)?;

        let output = factory.open(&format).map_err(|open_error| {
            error!(error = %open_error, "cannot open video output, aborting");
            FilterError::OutputOpen(open_error)
        })?;

        shuffler.shuffle(&mut grid)?;
        info!(
            rows = config.rows,
            cols = config.cols,
            black_slot = config.black_slot,
            adjacency = ?config.adjacency,
            width = format.width,
            height = format.height,
            "puzzle filter opened"
        );

        Ok(Self {
            controller: InteractionController::from_config(&config),
            config,
            format,
            retry: RetryPolicy::default(),
            state: Mutex::new(PuzzleState {
                grid,
                shuffler,
                pointer: None,
            }),
            output,
            closing: AtomicBool::new(false),
        })
    }

    /// Replaces the output retry backoff.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Configuration captured at open.
    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Output frame layout.
    pub fn format(&self) -> &PictureFormat {
        &self.format
    }

    /// Output collaborator.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Copy of the current grid.
    ///
    /// # Errors
    /// Returns [`FilterError::StatePoisoned`] when a previous holder panicked.
    pub fn grid_snapshot(&self) -> Result<Grid, FilterError> {
        Ok(self.lock_state()?.grid.clone())
    }

    /// Applies a click at pixel coordinates of a frame of the given size.
    ///
    /// # Errors
    /// Returns [`FilterError::StatePoisoned`] or [`FilterError::Interaction`].
    pub fn on_click(&self, event: ClickEvent) -> Result<ClickOutcome, FilterError> {
        let mut state = self.lock_state()?;
        self.apply_click(&mut state, event)
    }

    /// Tracks pointer moves and turns clicks into [`ClickEvent`]s on the output
    /// frame.
    ///
    /// # Returns
    /// `Ok(Some(_))` for a processed click, `Ok(None)` for moves and for clicks
    /// before any pointer position is known.
    ///
    /// # Errors
    /// Same as [`PuzzleFilter::on_click`].
    pub fn on_pointer_event(
        &self,
        event: PointerEvent,
    ) -> Result<Option<ClickOutcome>, FilterError> {
        let mut state = self.lock_state()?;
        match event {
            PointerEvent::Moved { x, y } => {
                state.pointer = Some((x, y));
                Ok(None)
            }
            PointerEvent::Clicked => {
                let Some((x, y)) = state.pointer else {
                    debug!("click before any pointer position; ignored");
                    return Ok(None);
                };
                let click = ClickEvent::new(x, y, self.format.width, self.format.height);
                self.apply_click(&mut state, click).map(Some)
            }
        }
    }

    /// Composes `source` into a caller-provided destination picture using the
    /// grid as it is when the call begins.
    ///
    /// # Errors
    /// Returns [`FilterError::Compose`] on layout mismatches and
    /// [`FilterError::StatePoisoned`] on a poisoned lock.
    pub fn compose_frame(
        &self,
        source: &Picture,
        destination: &mut Picture,
    ) -> Result<(), FilterError> {
        let grid = self.grid_snapshot()?;
        compose_tiles(source, destination, &grid)?;
        Ok(())
    }

    /// Renders one frame into a freshly acquired output picture and displays
    /// it with the source date.
    ///
    /// # Returns
    /// `Ok(true)` when a picture was displayed, `Ok(false)` when the filter was
    /// closed while waiting for an output buffer.
    ///
    /// # Errors
    /// Returns [`FilterError::Output`] when the output fails and
    /// [`FilterError::Compose`] on layout mismatches. No picture is displayed
    /// in either case.
    pub fn render(&self, source: &Picture) -> Result<bool, FilterError> {
        let Some(mut destination) = self.acquire_output()? else {
            return Ok(false);
        };
        destination.set_date(source.date());

        if let Err(compose_error) = self.compose_frame(source, &mut destination) {
            self.output.discard(destination);
            return Err(compose_error);
        }

        self.output.display(destination).map_err(|display_error| {
            error!(error = %display_error, "displaying picture failed");
            FilterError::Output(display_error)
        })?;
        Ok(true)
    }

    /// Requests teardown; a render waiting for an output buffer gives up.
    pub fn close(&self) {
        if !self.closing.swap(true, Ordering::SeqCst) {
            info!("puzzle filter closing");
        }
    }

    /// Returns `true` once [`PuzzleFilter::close`] was called.
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    fn apply_click(
        &self,
        state: &mut PuzzleState,
        event: ClickEvent,
    ) -> Result<ClickOutcome, FilterError> {
        let PuzzleState { grid, shuffler, .. } = state;
        let outcome = self.controller.on_click(grid, shuffler, event)?;
        if let ClickOutcome::Swapped { solved: true, .. } = outcome {
            info!("puzzle solved");
        }
        Ok(outcome)
    }

    fn acquire_output(&self) -> Result<Option<Picture>, FilterError> {
        let mut attempt = 0_u32;
        loop {
            let acquired = self.output.acquire().map_err(|acquire_error| {
                error!(error = %acquire_error, "output picture acquisition failed");
                FilterError::Output(acquire_error)
            })?;
            if let Some(picture) = acquired {
                return Ok(Some(picture));
            }

            if self.is_closing() {
                debug!(attempt, "filter closed while waiting for an output picture");
                return Ok(None);
            }
            if attempt == 0 {
                warn!("no free output picture; waiting");
            }

            std::thread::sleep(self.retry.delay_for(attempt));
            attempt = attempt.saturating_add(1);
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, PuzzleState>, FilterError> {
        self.state.lock().map_err(|_| FilterError::StatePoisoned)
    }
}

/// Reads configuration from `TILE_PUZZLE_*` environment variables.
///
/// When `TILE_PUZZLE_CONFIG` names a JSON file, it is loaded first and the
/// remaining variables override its fields. Unset or blank variables keep
/// their defaults (4x4, classic mode, four-neighbour adjacency). Booleans
/// accept `1/true/on/yes` and `0/false/off/no`, case-insensitive.
///
/// # Errors
/// Returns [`FilterError::ConfigFile`] when the file cannot be read,
/// [`FilterError::Config`] when it does not decode or dimensions are out of
/// range, and [`FilterError::InvalidEnv`] for unparsable values.
pub fn config_from_env() -> Result<PuzzleConfig, FilterError> {
    let mut config = match read_env(ENV_CONFIG_FILE) {
        Some(path) => load_config_file(Path::new(&path))?,
        None => PuzzleConfig::default(),
    };

    if let Some(value) = read_env(ENV_ROWS) {
        config.rows = parse_dimension(ENV_ROWS, &value)?;
    }
    if let Some(value) = read_env(ENV_COLS) {
        config.cols = parse_dimension(ENV_COLS, &value)?;
    }
    if let Some(value) = read_env(ENV_BLACK_SLOT) {
        config.black_slot = parse_flag(ENV_BLACK_SLOT, &value)?;
    }
    if let Some(value) = read_env(ENV_ADJACENCY) {
        config.adjacency = parse_adjacency(ENV_ADJACENCY, &value)?;
    }

    config.validate().map_err(FilterError::Config)?;
    Ok(config)
}

/// Loads a JSON configuration file; missing keys keep their defaults.
///
/// # Errors
/// Returns [`FilterError::ConfigFile`] when the file cannot be read and
/// [`FilterError::Config`] for malformed or out-of-range content.
pub fn load_config_file(path: &Path) -> Result<PuzzleConfig, FilterError> {
    let raw = std::fs::read(path).map_err(|source| FilterError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;
    let config = PuzzleConfig::from_json_bytes(&raw).map_err(FilterError::Config)?;
    debug!(path = %path.display(), "configuration file loaded");
    Ok(config)
}

/// Deterministic test pattern laid out as `format`: a diagonal luma ramp and
/// per-plane chroma ramps, so every tile is visually distinct.
///
/// # Errors
/// Returns [`FilterError::Picture`] for inconsistent plane geometry.
pub fn synthetic_picture(format: &PictureFormat, date: i64) -> Result<Picture, FilterError> {
    let mut picture = Picture::blank(format, date).map_err(FilterError::Picture)?;
    for (plane_index, plane) in picture.planes_mut().iter_mut().enumerate() {
        let pitch = plane.pitch();
        let visible = plane.visible_pitch();
        for (offset, byte) in plane.pixels_mut().iter_mut().enumerate() {
            let (y, x) = (offset / pitch, offset % pitch);
            if x >= visible {
                continue;
            }
            *byte = if plane_index == LUMA_PLANE {
                ((x + y) % 256) as u8
            } else {
                ((x * 4 + plane_index * 64) % 256) as u8
            };
        }
    }
    Ok(picture)
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_dimension(key: &'static str, value: &str) -> Result<u32, FilterError> {
    value.parse().map_err(|_| FilterError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, FilterError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(FilterError::InvalidEnv {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_adjacency(key: &'static str, value: &str) -> Result<AdjacencyRule, FilterError> {
    match value.to_ascii_lowercase().as_str() {
        "four-neighbor" => Ok(AdjacencyRule::FourNeighbor),
        "row-wrap" => Ok(AdjacencyRule::RowWrap),
        _ => Err(FilterError::InvalidEnv {
            key,
            value: value.to_string(),
        }),
    }
}

/// Filter error type.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Configuration or grid construction failed.
    #[error("configuration error: {0}")]
    Config(CoreError),
    /// Picture could not be built for the requested format.
    #[error("picture error: {0}")]
    Picture(CoreError),
    /// Configuration file could not be read.
    #[error("cannot read configuration file {}: {source}", .path.display())]
    ConfigFile {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Environment variable could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
    /// Shuffling failed.
    #[error("shuffle error: {0}")]
    Shuffle(#[from] ShuffleError),
    /// Click handling failed.
    #[error("interaction error: {0}")]
    Interaction(#[from] InteractionError),
    /// Output could not be opened.
    #[error("output open error: {0}")]
    OutputOpen(OutputError),
    /// Output failed while rendering.
    #[error("output error: {0}")]
    Output(OutputError),
    /// Frame composition failed.
    #[error("compose error: {0}")]
    Compose(#[from] CompositorError),
    /// Shared puzzle state lock was poisoned.
    #[error("puzzle state lock poisoned")]
    StatePoisoned,
}

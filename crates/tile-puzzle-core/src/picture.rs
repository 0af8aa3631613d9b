//! Planar pictures and block-level plane operations.

use crate::CoreError;

/// Index of the luma plane in planar YUV pictures.
pub const LUMA_PLANE: usize = 0;

/// Memory geometry of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneFormat {
    /// Bytes between the starts of two consecutive lines.
    pub pitch: usize,
    /// Number of lines.
    pub lines: usize,
    /// Bytes of visible pixels per line (`<= pitch`).
    pub visible_pitch: usize,
}

impl PlaneFormat {
    /// Plane without line padding.
    pub fn packed(width: usize, lines: usize) -> Self {
        Self {
            pitch: width,
            lines,
            visible_pitch: width,
        }
    }

    /// Required buffer length in bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPlaneShape`] when the visible width exceeds
    /// the pitch or the length overflows.
    pub fn buffer_len(&self) -> Result<usize, CoreError> {
        if self.visible_pitch > self.pitch {
            return Err(CoreError::InvalidPlaneShape(format!(
                "visible pitch {} exceeds pitch {}",
                self.visible_pitch, self.pitch
            )));
        }

        self.pitch
            .checked_mul(self.lines)
            .ok_or_else(|| CoreError::InvalidPlaneShape("plane length overflow".to_string()))
    }
}

/// Frame geometry: display size plus per-plane memory layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PictureFormat {
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Plane layouts, luma first.
    pub planes: Vec<PlaneFormat>,
}

impl PictureFormat {
    /// Planar 4:2:0 layout: full-size luma and two half-size chroma planes.
    pub fn i420(width: u32, height: u32) -> Self {
        let luma = PlaneFormat::packed(width as usize, height as usize);
        let chroma = PlaneFormat::packed(width.div_ceil(2) as usize, height.div_ceil(2) as usize);
        Self {
            width,
            height,
            planes: vec![luma, chroma, chroma],
        }
    }

    /// Single 8-bit luma plane.
    pub fn gray8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            planes: vec![PlaneFormat::packed(width as usize, height as usize)],
        }
    }
}

/// One pixel plane with its own pitch and line count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    format: PlaneFormat,
    pixels: Vec<u8>,
}

impl Plane {
    /// Creates a zero-filled plane.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPlaneShape`] for inconsistent geometry.
    pub fn new(format: PlaneFormat) -> Result<Self, CoreError> {
        let len = format.buffer_len()?;
        Ok(Self {
            format,
            pixels: vec![0; len],
        })
    }

    /// Wraps an existing buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPlaneShape`] when `pixels.len()` is not
    /// `pitch * lines`.
    pub fn from_pixels(format: PlaneFormat, pixels: Vec<u8>) -> Result<Self, CoreError> {
        let expected = format.buffer_len()?;
        if pixels.len() != expected {
            return Err(CoreError::InvalidPlaneShape(format!(
                "expected {expected} bytes, got {}",
                pixels.len()
            )));
        }

        Ok(Self { format, pixels })
    }

    /// Plane geometry.
    pub fn format(&self) -> PlaneFormat {
        self.format
    }

    /// Bytes per line in memory.
    pub fn pitch(&self) -> usize {
        self.format.pitch
    }

    /// Line count.
    pub fn lines(&self) -> usize {
        self.format.lines
    }

    /// Visible bytes per line.
    pub fn visible_pitch(&self) -> usize {
        self.format.visible_pitch
    }

    /// Raw buffer including line padding.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw buffer including line padding.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Visible bytes of line `y`.
    pub fn line(&self, y: usize) -> Option<&[u8]> {
        if y >= self.format.lines {
            return None;
        }
        let start = y * self.format.pitch;
        Some(&self.pixels[start..start + self.format.visible_pitch])
    }

    /// Byte at `(x, y)` within the visible area.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.line(y).and_then(|line| line.get(x).copied())
    }

    /// Copies `from` in `source` into the equally sized `to` in this plane,
    /// line by line.
    ///
    /// # Errors
    /// Returns [`CoreError::BlockOutOfBounds`] when either rectangle leaves its
    /// plane, and [`CoreError::InvalidPlaneShape`] when their sizes differ.
    pub fn copy_block_from(
        &mut self,
        source: &Plane,
        from: BlockRect,
        to: BlockRect,
    ) -> Result<(), CoreError> {
        if from.width != to.width || from.height != to.height {
            return Err(CoreError::InvalidPlaneShape(format!(
                "block size mismatch: {}x{} into {}x{}",
                from.width, from.height, to.width, to.height
            )));
        }
        source.check_rect(from)?;
        self.check_rect(to)?;

        for line in 0..from.height {
            let src_offset = (from.y + line) * source.format.pitch + from.x;
            let dst_offset = (to.y + line) * self.format.pitch + to.x;
            self.pixels[dst_offset..dst_offset + to.width]
                .copy_from_slice(&source.pixels[src_offset..src_offset + from.width]);
        }

        Ok(())
    }

    /// Sets every byte inside `rect` to `value`.
    ///
    /// # Errors
    /// Returns [`CoreError::BlockOutOfBounds`] when `rect` leaves the plane.
    pub fn fill_block(&mut self, rect: BlockRect, value: u8) -> Result<(), CoreError> {
        self.check_rect(rect)?;

        for line in rect.y..rect.y + rect.height {
            let offset = line * self.format.pitch + rect.x;
            self.pixels[offset..offset + rect.width].fill(value);
        }

        Ok(())
    }

    /// Draws a one-byte-wide border of `value` along the edges of `rect`.
    ///
    /// # Errors
    /// Returns [`CoreError::BlockOutOfBounds`] when `rect` leaves the plane.
    pub fn outline_block(&mut self, rect: BlockRect, value: u8) -> Result<(), CoreError> {
        self.check_rect(rect)?;
        if rect.is_empty() {
            return Ok(());
        }

        let pitch = self.format.pitch;
        let top = rect.y * pitch + rect.x;
        let bottom = (rect.y + rect.height - 1) * pitch + rect.x;
        self.pixels[top..top + rect.width].fill(value);
        self.pixels[bottom..bottom + rect.width].fill(value);

        for line in rect.y..rect.y + rect.height {
            let offset = line * pitch + rect.x;
            self.pixels[offset] = value;
            self.pixels[offset + rect.width - 1] = value;
        }

        Ok(())
    }

    fn check_rect(&self, rect: BlockRect) -> Result<(), CoreError> {
        let fits_x = rect
            .x
            .checked_add(rect.width)
            .is_some_and(|right| right <= self.format.visible_pitch);
        let fits_y = rect
            .y
            .checked_add(rect.height)
            .is_some_and(|bottom| bottom <= self.format.lines);

        if fits_x && fits_y {
            return Ok(());
        }

        Err(CoreError::BlockOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            plane_width: self.format.visible_pitch,
            plane_lines: self.format.lines,
        })
    }
}

/// Planar picture with a presentation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    planes: Vec<Plane>,
    date: i64,
}

impl Picture {
    /// Builds a picture from owned planes.
    pub fn new(planes: Vec<Plane>, date: i64) -> Self {
        Self { planes, date }
    }

    /// Zero-filled picture laid out as `format`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPlaneShape`] for inconsistent plane geometry.
    pub fn blank(format: &PictureFormat, date: i64) -> Result<Self, CoreError> {
        let planes = format
            .planes
            .iter()
            .map(|plane| Plane::new(*plane))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { planes, date })
    }

    /// Planes, luma first.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Mutable planes.
    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    /// Plane at `index`.
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index)
    }

    /// Presentation date in microseconds.
    pub fn date(&self) -> i64 {
        self.date
    }

    /// Overrides the presentation date.
    pub fn set_date(&mut self, date: i64) {
        self.date = date;
    }

    /// Per-plane geometry in order.
    pub fn plane_formats(&self) -> Vec<PlaneFormat> {
        self.planes.iter().map(Plane::format).collect()
    }

    /// Returns `true` when both pictures share plane count and geometry.
    pub fn same_layout(&self, other: &Picture) -> bool {
        self.planes.len() == other.planes.len()
            && self
                .planes
                .iter()
                .zip(&other.planes)
                .all(|(left, right)| left.format == right.format)
    }
}

/// Axis-aligned rectangle inside a plane, in bytes and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRect {
    /// Left byte offset.
    pub x: usize,
    /// Top line.
    pub y: usize,
    /// Width in bytes.
    pub width: usize,
    /// Height in lines.
    pub height: usize,
}

impl BlockRect {
    /// Returns `true` when the rectangle covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Partition of one plane into `rows x cols` equal blocks.
///
/// Remainder bytes and lines left over by uneven division belong to no block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockLayout {
    /// Grid row count.
    pub rows: usize,
    /// Grid column count.
    pub cols: usize,
    /// Block width in bytes.
    pub block_width: usize,
    /// Block height in lines.
    pub block_height: usize,
}

impl BlockLayout {
    /// Layout for `format` split into `rows x cols` blocks.
    pub fn for_plane(format: PlaneFormat, rows: usize, cols: usize) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        Self {
            rows,
            cols,
            block_width: format.visible_pitch / cols,
            block_height: format.lines / rows,
        }
    }

    /// Rectangle of the block at `(row, col)`.
    pub fn rect(&self, row: usize, col: usize) -> BlockRect {
        BlockRect {
            x: col * self.block_width,
            y: row * self.block_height,
            width: self.block_width,
            height: self.block_height,
        }
    }

    /// Rectangle of the block holding row-major `slot`.
    pub fn slot_rect(&self, slot: usize) -> BlockRect {
        self.rect(slot / self.cols, slot % self.cols)
    }
}

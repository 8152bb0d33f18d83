//! Viewport Compositor
//!
//! Assembles cached tiles into one contiguous raster for a fractional
//! block range and zoom factor:
//!
//! ```text
//! [lower, upper) blocks → tiles (white filler where missing)
//!                       → trim fractional edges on whole-row boundaries
//!                       → keep 1 row in `zoom`
//!                       → raster + missing block list
//! ```
//!
//! Composition never blocks and never fails because data has not arrived:
//! absent blocks render as opaque white rows and their indices come back in
//! ascending order so the caller can schedule fetches. Output dimensions
//! depend only on the viewport and the row geometry, never on which blocks
//! happened to be cached.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::params::RenderParams;
use crate::tile_cache::TileCache;
use crate::types::{RenderError, RenderResult};

/// Opaque white, used for rows whose block has not been delivered yet.
const FILLER_RGBA: [u8; 4] = [255, 255, 255, 255];

/// A half-open fractional block range plus a row decimation factor.
///
/// `lower` and `upper` are in units of blocks and support sub-block
/// precision for smooth scrolling. `zoom >= 1` means "keep 1 row out of
/// every `zoom`"; magnification is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub lower: f64,
    pub upper: f64,
    pub zoom: usize,
}

impl Viewport {
    pub fn new(lower: f64, upper: f64, zoom: usize) -> RenderResult<Self> {
        let viewport = Self { lower, upper, zoom };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.zoom < 1 {
            return Err(RenderError::InvalidZoom(self.zoom));
        }
        if !self.lower.is_finite()
            || !self.upper.is_finite()
            || self.lower < 0.0
            || self.lower >= self.upper
        {
            return Err(RenderError::InvalidViewport {
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    /// Whole block indices the viewport touches: `floor(lower)..ceil(upper)`.
    pub fn blocks(&self) -> std::ops::Range<u64> {
        self.lower.floor() as u64..self.upper.ceil() as u64
    }

    /// Map a scrollbar handle position to a viewport.
    ///
    /// `handle_fraction` is the handle's top edge as a fraction of the
    /// scrollbar track (clamped to `[0, 1]`). The viewport spans
    /// `viewport_rows` on-screen rows, each consuming `zoom` FFT rows, and
    /// is shifted up when it would run past the end of the capture.
    pub fn from_scroll(
        handle_fraction: f64,
        viewport_rows: usize,
        zoom: usize,
        params: &RenderParams,
        total_samples: u64,
    ) -> RenderResult<Self> {
        if zoom < 1 {
            return Err(RenderError::InvalidZoom(zoom));
        }
        if total_samples == 0 {
            return Err(RenderError::EmptyCapture);
        }
        let total_blocks = total_samples as f64 / params.block_len as f64;
        let span = (viewport_rows * zoom) as f64 / params.rows_per_block() as f64;
        let mut lower = handle_fraction.clamp(0.0, 1.0) * total_blocks;
        if lower + span > total_blocks {
            lower = (total_blocks - span).max(0.0);
        }
        let upper = (lower + span).min(total_blocks);
        Self::new(lower, upper, zoom)
    }
}

/// An RGBA raster with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Raster {
    /// One pixel row as raw RGBA bytes.
    pub fn row(&self, index: usize) -> &[u8] {
        let stride = self.width * 4;
        &self.pixels[index * stride..(index + 1) * stride]
    }
}

/// A composed viewport raster plus the blocks that rendered as filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    pub raster: Raster,
    /// Blocks in the viewport with no cached tile, ascending.
    pub missing_blocks: Vec<u64>,
}

/// Compose the viewport's rows from the cache into one raster.
///
/// The raster is always `fft_size` pixels wide and exactly
/// `floor((upper - lower) * rows_per_block) / zoom` rows tall. Fractional
/// edges are trimmed on whole-row boundaries: the top by
/// `floor(frac(lower) * rows_per_block)` rows, the bottom by whatever
/// remains beyond the target height. Rows appear in ascending block,
/// ascending in-block order.
pub fn compose(viewport: &Viewport, cache: &TileCache) -> RenderResult<Composite> {
    viewport.validate()?;

    let rows_per_block = cache.params().rows_per_block();
    let width = cache.params().fft_size;
    let stride = width * 4;

    let first_block = viewport.lower.floor() as u64;
    let missing_blocks: Vec<u64> = viewport
        .blocks()
        .filter(|&block| !cache.contains(block))
        .collect();
    if !missing_blocks.is_empty() {
        debug!(
            "composing [{}, {}) with {} missing blocks",
            viewport.lower,
            viewport.upper,
            missing_blocks.len()
        );
    }

    let target_rows =
        ((viewport.upper - viewport.lower) * rows_per_block as f64).floor() as usize;
    let top_trim = (viewport.lower.fract() * rows_per_block as f64).floor() as usize;
    let out_rows = target_rows / viewport.zoom;

    let filler: Vec<u8> = FILLER_RGBA.repeat(width);
    let mut pixels = Vec::with_capacity(out_rows * stride);
    for i in 0..out_rows {
        let global_row = top_trim + i * viewport.zoom;
        let block = first_block + (global_row / rows_per_block) as u64;
        let in_row = global_row % rows_per_block;
        match cache.get(block) {
            Some(tile) => pixels.extend_from_slice(tile.row(in_row)),
            None => pixels.extend_from_slice(&filler),
        }
    }

    Ok(Composite {
        raster: Raster {
            pixels,
            width,
            height: out_rows,
        },
        missing_blocks,
    })
}

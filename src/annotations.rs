//! Annotation Coordinate Mapping
//!
//! Annotations live in the sample domain: a time extent in samples and a
//! frequency extent in Hz. Drawing them over a composed raster (or turning
//! a dragged box back into an annotation) needs the mapping between that
//! domain and raster pixels for the current viewport:
//!
//! ```text
//! x = (freq - (center - rate/2)) / rate · fft_size
//! y = (sample - lower_block · block_len) / fft_size / zoom
//! ```
//!
//! Both directions are pure functions of a [`ViewMapping`]; nothing here
//! touches the annotation list itself, so a visibility test can never
//! corrupt stored sample values.

use serde::{Deserialize, Serialize};

use crate::compositor::Viewport;
use crate::params::RenderParams;
use crate::types::CaptureMetadata;

/// A labelled sample-domain rectangle over a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// First sample covered
    pub sample_start: u64,
    /// Number of samples covered
    pub sample_count: u64,
    /// Lower frequency edge in Hz
    pub freq_lower_edge: f64,
    /// Upper frequency edge in Hz
    pub freq_upper_edge: f64,
    /// Free-text label
    #[serde(default)]
    pub label: String,
}

/// Sample-domain bounds with fractional precision.
///
/// Dragged boxes land between integer samples; the fractional form keeps
/// the forward/inverse mapping lossless. Rounding back to an
/// [`Annotation`] is the caller's final step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleBounds {
    pub sample_start: f64,
    pub sample_count: f64,
    pub freq_lower_edge: f64,
    pub freq_upper_edge: f64,
}

impl From<&Annotation> for SampleBounds {
    fn from(a: &Annotation) -> Self {
        Self {
            sample_start: a.sample_start as f64,
            sample_count: a.sample_count as f64,
            freq_lower_edge: a.freq_lower_edge,
            freq_upper_edge: a.freq_upper_edge,
        }
    }
}

/// Raster-pixel bounds of a box: `x` in bins, `y` in composed rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Everything the sample/pixel mapping depends on for one composed view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMapping {
    /// Fractional block index at the top of the viewport
    pub lower_block: f64,
    /// Complex samples per block
    pub block_len: usize,
    /// FFT size (raster width in pixels)
    pub fft_size: usize,
    /// Row decimation factor
    pub zoom: usize,
    /// Capture sample rate in Hz
    pub sample_rate: f64,
    /// Capture center frequency in Hz
    pub center_frequency: f64,
}

impl ViewMapping {
    pub fn new(
        viewport: &Viewport,
        params: &RenderParams,
        metadata: &CaptureMetadata,
    ) -> Self {
        Self {
            lower_block: viewport.lower,
            block_len: params.block_len,
            fft_size: params.fft_size,
            zoom: viewport.zoom,
            sample_rate: metadata.sample_rate,
            center_frequency: metadata.center_frequency,
        }
    }

    /// Frequency at the left edge of the raster (bin 0).
    fn freq_base(&self) -> f64 {
        self.center_frequency - self.sample_rate / 2.0
    }

    /// First sample shown at the top of the viewport.
    fn start_sample(&self) -> f64 {
        self.lower_block * self.block_len as f64
    }

    /// Sample-domain bounds to raster-pixel bounds.
    pub fn to_pixels(&self, bounds: &SampleBounds) -> PixelBounds {
        let x1 = (bounds.freq_lower_edge - self.freq_base()) / self.sample_rate
            * self.fft_size as f64;
        let x2 = (bounds.freq_upper_edge - self.freq_base()) / self.sample_rate
            * self.fft_size as f64;
        let samples_per_row = (self.fft_size * self.zoom) as f64;
        let y1 = (bounds.sample_start - self.start_sample()) / samples_per_row;
        let y2 =
            (bounds.sample_start + bounds.sample_count - self.start_sample()) / samples_per_row;
        PixelBounds { x1, x2, y1, y2 }
    }

    /// Raster-pixel bounds back to sample-domain bounds.
    pub fn to_samples(&self, pixels: &PixelBounds) -> SampleBounds {
        let per_bin = self.sample_rate / self.fft_size as f64;
        let samples_per_row = (self.fft_size * self.zoom) as f64;
        let sample_start = pixels.y1 * samples_per_row + self.start_sample();
        SampleBounds {
            sample_start,
            sample_count: (pixels.y2 - pixels.y1) * samples_per_row,
            freq_lower_edge: pixels.x1 * per_bin + self.freq_base(),
            freq_upper_edge: pixels.x2 * per_bin + self.freq_base(),
        }
    }

    /// Whether the box's row range intersects `[0, visible_rows)`.
    ///
    /// Purely a read: invisible annotations are skipped when drawing, their
    /// sample values stay untouched.
    pub fn is_visible(&self, bounds: &SampleBounds, visible_rows: usize) -> bool {
        let px = self.to_pixels(bounds);
        px.y2 > 0.0 && px.y1 < visible_rows as f64
    }
}

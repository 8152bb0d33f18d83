//! Core types for spectrogram rendering
//!
//! This module defines the fundamental types shared by the rendering
//! pipeline: complex I/Q sample aliases, the crate error type, and the
//! capture metadata the renderer consumes (but does not validate).
//!
//! ## Understanding I/Q Samples
//!
//! A recorded capture is a stream of complex samples where:
//! - **I (In-phase)**: the real component
//! - **Q (Quadrature)**: the imaginary component
//!
//! On disk and on the wire the samples arrive as interleaved 32-bit floats
//! (`I0 Q0 I1 Q1 ...`). The renderer consumes them in fixed-size blocks of
//! [`DEFAULT_BLOCK_LEN`] complex samples (so `2 * DEFAULT_BLOCK_LEN` floats),
//! identified by a non-negative block index. Conversion from other source
//! encodings (8/16-bit ints etc.) happens upstream; this crate only ever
//! sees interleaved `f32`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::annotations::Annotation;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// One FFT's worth of frequency-shifted magnitudes, in dB
pub type MagnitudeRow = Vec<f64>;

/// Number of complex samples per block unless the caller configures otherwise.
///
/// A block of this length yields `DEFAULT_BLOCK_LEN / fft_size` FFT rows.
pub const DEFAULT_BLOCK_LEN: usize = 131_072;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while configuring or running the render pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid FFT size: {0}. Must be a power of two and at least 32")]
    InvalidFftSize(usize),

    #[error("Window length {0} is too short. Must be at least 2")]
    WindowTooShort(usize),

    #[error("Invalid magnitude scale: min {min} must be finite and below max {max}")]
    InvalidScale { min: f64, max: f64 },

    #[error("Invalid zoom factor: {0}. Must be at least 1")]
    InvalidZoom(usize),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid viewport: [{lower}, {upper}) is not a non-empty forward range")]
    InvalidViewport { lower: f64, upper: f64 },

    #[error("Invalid block length: {0}. Must be positive")]
    InvalidBlockLen(usize),

    #[error("Capture has no samples to render")]
    EmptyCapture,
}

/// Capture-level metadata the renderer consumes.
///
/// The fields mirror what recording formats carry per capture segment. This
/// crate reads them to place annotations and minimap ticks; it performs no
/// schema validation (that belongs to whatever parsed the recording).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Center frequency of the capture in Hz
    pub center_frequency: f64,
    /// Total number of complex samples in the capture
    pub total_samples: u64,
    /// Annotations over the capture, in file order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl CaptureMetadata {
    pub fn new(sample_rate: f64, center_frequency: f64, total_samples: u64) -> Self {
        Self {
            sample_rate,
            center_frequency,
            total_samples,
            annotations: Vec::new(),
        }
    }

    /// Number of whole blocks in the capture for a given block length.
    pub fn total_blocks(&self, block_len: usize) -> u64 {
        if block_len == 0 {
            return 0;
        }
        self.total_samples.div_ceil(block_len as u64)
    }
}

//! Window Functions for Spectral Analysis
//!
//! Precomputed window coefficient generation and in-place application to
//! interleaved I/Q sample slices. Windowing reduces spectral leakage when a
//! block is cut into FFT-sized pieces.
//!
//! ## Supported windows
//!
//! | Window      | w(i), i in [0, N)                                      |
//! |-------------|--------------------------------------------------------|
//! | Rectangular | 1                                                      |
//! | Hamming     | 0.54 - 0.46·cos(2πi/(N-1))                             |
//! | Hanning     | 0.5 - 0.5·cos(2πi/(N-1))                               |
//! | Bartlett    | (2/(N-1))·((N-1)/2 - |i - (N-1)/2|)                    |
//! | Blackman    | 0.42 - 0.5·cos(2πi/N) + 0.08·cos(4πi/N)                |
//!
//! The weight vector is applied across the first `N` interleaved float
//! positions of a `2N`-float I/Q slice (I and Q elements alternate), which is
//! the convention the colormap and auto-scale thresholds downstream are
//! calibrated against.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::types::{RenderError, RenderResult};

/// Window function kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Rectangular,
    Hamming,
    Hanning,
    Bartlett,
    Blackman,
}

impl WindowKind {
    /// Parse a window name as used in recording viewer settings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rectangle" | "rectangular" | "none" => Some(Self::Rectangular),
            "hamming" => Some(Self::Hamming),
            "hanning" | "hann" => Some(Self::Hanning),
            "bartlett" => Some(Self::Bartlett),
            "blackman" => Some(Self::Blackman),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangular => "rectangle",
            Self::Hamming => "hamming",
            Self::Hanning => "hanning",
            Self::Bartlett => "bartlett",
            Self::Blackman => "blackman",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute window coefficients for an FFT of `fft_size` points.
///
/// Lengths below 2 are rejected: the Hamming, Hanning and Bartlett formulas
/// divide by `fft_size - 1`.
pub fn coefficients(kind: WindowKind, fft_size: usize) -> RenderResult<Vec<f64>> {
    if fft_size < 2 {
        return Err(RenderError::WindowTooShort(fft_size));
    }
    let n = fft_size as f64;
    let coeffs = (0..fft_size)
        .map(|i| {
            let i = i as f64;
            match kind {
                WindowKind::Rectangular => 1.0,
                WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * i / (n - 1.0)).cos(),
                WindowKind::Hanning => 0.5 - 0.5 * (2.0 * PI * i / (n - 1.0)).cos(),
                WindowKind::Bartlett => {
                    (2.0 / (n - 1.0)) * ((n - 1.0) / 2.0 - (i - (n - 1.0) / 2.0).abs())
                }
                WindowKind::Blackman => {
                    0.42 - 0.5 * (2.0 * PI * i / n).cos() + 0.08 * (4.0 * PI * i / n).cos()
                }
            }
        })
        .collect();
    Ok(coeffs)
}

/// Apply a precomputed weight vector to an interleaved I/Q slice in place.
///
/// Scales the first `weights.len()` float positions; any remaining floats in
/// the slice pass through unchanged.
pub fn apply_interleaved(samples: &mut [f32], weights: &[f64]) {
    for (s, w) in samples.iter_mut().zip(weights.iter()) {
        *s = (*s as f64 * w) as f32;
    }
}

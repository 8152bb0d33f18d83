//! Render Parameters and Configuration
//!
//! This module defines the configuration surface a viewer exposes for the
//! rendering pipeline: FFT size, window function, magnitude scale and
//! colormap, plus the per-session block length.
//!
//! Every pipeline stage takes its parameters explicitly from a
//! [`RenderParams`] value. There is no module-level "current settings"
//! state; two captures rendered with different parameters never interfere.
//!
//! ## Parameter effects
//!
//! | Parameter  | Affects                                   | Cache impact |
//! |------------|-------------------------------------------|--------------|
//! | `fft_size` | frequency resolution, raster width        | invalidates  |
//! | `window`   | spectral leakage                          | invalidates  |
//! | `scale`    | intensity mapping                         | invalidates  |
//! | `colormap` | pixel colors                              | invalidates  |
//! | `block_len`| rows per block, tile granularity          | fixed per session |
//!
//! Rendered tiles bake all of these in, so any change requires clearing the
//! tile cache (see the cache module).

use serde::{Deserialize, Serialize};

use crate::colormap::Colormap;
use crate::scale::MagnitudeScale;
use crate::types::{RenderError, RenderResult, DEFAULT_BLOCK_LEN};
use crate::window::WindowKind;

/// How the (min, max) magnitude scale is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Caller-supplied fixed bounds.
    Fixed(MagnitudeScale),
    /// Derive bounds from block statistics on first use.
    Auto,
}

impl Default for ScaleMode {
    fn default() -> Self {
        Self::Auto
    }
}

/// Complete rendering configuration for one capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    /// FFT size in bins (power of two, at least 32); also the raster width
    pub fft_size: usize,
    /// Complex samples per block; samples past the last whole FFT row of a
    /// block are dropped
    pub block_len: usize,
    /// Window function applied before each FFT
    pub window: WindowKind,
    /// Magnitude-to-intensity scale selection
    pub scale: ScaleMode,
    /// Colormap for intensity-to-pixel lookup
    pub colormap: Colormap,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            block_len: DEFAULT_BLOCK_LEN,
            window: WindowKind::Hamming,
            scale: ScaleMode::Auto,
            colormap: Colormap::Viridis,
        }
    }
}

impl RenderParams {
    /// Create a new builder for render parameters
    pub fn builder() -> RenderParamsBuilder {
        RenderParamsBuilder::default()
    }

    /// Number of FFT rows one full block yields.
    ///
    /// A block length that is not a multiple of `fft_size` truncates: the
    /// trailing remainder never becomes a row.
    pub fn rows_per_block(&self) -> usize {
        self.block_len / self.fft_size
    }

    /// Check the configuration invariants.
    ///
    /// `fft_size` must be a power of two and at least 32, `block_len` must
    /// be positive, and a fixed scale must be well-formed.
    pub fn validate(&self) -> RenderResult<()> {
        if self.fft_size < 32 || !self.fft_size.is_power_of_two() {
            return Err(RenderError::InvalidFftSize(self.fft_size));
        }
        if self.block_len == 0 {
            return Err(RenderError::InvalidBlockLen(0));
        }
        if let ScaleMode::Fixed(scale) = self.scale {
            scale.validate()?;
        }
        Ok(())
    }
}

/// Builder for RenderParams
#[derive(Default)]
pub struct RenderParamsBuilder {
    params: RenderParams,
}

impl RenderParamsBuilder {
    pub fn fft_size(mut self, fft_size: usize) -> Self {
        self.params.fft_size = fft_size;
        self
    }

    pub fn block_len(mut self, block_len: usize) -> Self {
        self.params.block_len = block_len;
        self
    }

    pub fn window(mut self, window: WindowKind) -> Self {
        self.params.window = window;
        self
    }

    pub fn fixed_scale(mut self, min: f64, max: f64) -> Self {
        self.params.scale = ScaleMode::Fixed(MagnitudeScale { min, max });
        self
    }

    pub fn autoscale(mut self) -> Self {
        self.params.scale = ScaleMode::Auto;
        self
    }

    pub fn colormap(mut self, colormap: Colormap) -> Self {
        self.params.colormap = colormap;
        self
    }

    /// Validate and produce the final parameters.
    pub fn build(self) -> RenderResult<RenderParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = RenderParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.rows_per_block(), 128);
    }

    #[test]
    fn test_rejects_bad_fft_sizes() {
        for bad in [0, 16, 17, 100, 1000] {
            let result = RenderParams::builder().fft_size(bad).build();
            assert_eq!(
                result.unwrap_err(),
                RenderError::InvalidFftSize(bad),
                "fft_size {bad} must be rejected"
            );
        }
        for good in [32, 64, 1024, 65536] {
            assert!(RenderParams::builder()
                .fft_size(good)
                .block_len(131_072)
                .build()
                .is_ok());
        }
    }

    #[test]
    fn test_non_multiple_block_len_truncates() {
        // 1500 samples at 1024 bins: one whole row, 476 samples dropped
        let params = RenderParams::builder()
            .fft_size(1024)
            .block_len(1500)
            .build()
            .unwrap();
        assert_eq!(params.rows_per_block(), 1);
    }

    #[test]
    fn test_rejects_zero_block_len() {
        let result = RenderParams::builder().block_len(0).build();
        assert_eq!(result.unwrap_err(), RenderError::InvalidBlockLen(0));
    }

    #[test]
    fn test_rejects_degenerate_fixed_scale() {
        let result = RenderParams::builder().fixed_scale(-10.0, -10.0).build();
        assert!(matches!(
            result,
            Err(RenderError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_builder_round_trip() {
        let params = RenderParams::builder()
            .fft_size(256)
            .block_len(131_072)
            .window(WindowKind::Blackman)
            .fixed_scale(-40.0, -10.0)
            .colormap(Colormap::Jet)
            .build()
            .unwrap();
        assert_eq!(params.fft_size, 256);
        assert_eq!(params.rows_per_block(), 512);
        assert_eq!(params.window, WindowKind::Blackman);
        assert_eq!(params.colormap, Colormap::Jet);
    }
}

//! Spectral Block Transformer
//!
//! Turns one block of interleaved I/Q samples into frequency-shifted
//! magnitude rows in dB, one row per FFT window:
//!
//! ```text
//! interleaved f32 → window → FFT → ÷N → |·| → fft-shift → 10·log10 → rows
//! ```
//!
//! The transformer owns a planned FFT, its scratch buffer and the
//! precomputed window weights, so repeated blocks reuse all allocations.
//! Dropped and undersized input degrades to zero samples rather than
//! erroring; a short block still yields the full number of rows.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::params::RenderParams;
use crate::types::{MagnitudeRow, RenderResult};
use crate::window::{self, WindowKind};

/// Windowed-FFT processor for fixed-size sample blocks.
pub struct BlockTransformer {
    fft_size: usize,
    rows_per_block: usize,
    window: WindowKind,
    weights: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
    buffer: Vec<Complex64>,
}

impl BlockTransformer {
    /// Plan an FFT and precompute window weights for the given parameters.
    pub fn new(params: &RenderParams) -> RenderResult<Self> {
        params.validate()?;
        Self::with_shape(params.fft_size, params.block_len, params.window)
    }

    /// Like [`BlockTransformer::new`] but with an explicit shape, for
    /// pipelines that run at a different FFT size than the main view.
    pub fn with_shape(
        fft_size: usize,
        block_len: usize,
        window: WindowKind,
    ) -> RenderResult<Self> {
        let weights = window::coefficients(window, fft_size)?;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Ok(Self {
            fft_size,
            rows_per_block: block_len / fft_size,
            window,
            weights,
            fft,
            scratch,
            buffer: vec![Complex64::new(0.0, 0.0); fft_size],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn rows_per_block(&self) -> usize {
        self.rows_per_block
    }

    pub fn window(&self) -> WindowKind {
        self.window
    }

    /// Transform one block of interleaved I/Q floats into magnitude rows.
    ///
    /// Always returns `rows_per_block` rows of `fft_size` dB values each.
    /// Samples past the end of `samples` read as zero, so partial blocks
    /// render as zero-filled rows instead of failing.
    pub fn transform(&mut self, samples: &[f32]) -> Vec<MagnitudeRow> {
        let mut rows = Vec::with_capacity(self.rows_per_block);
        for r in 0..self.rows_per_block {
            rows.push(self.transform_row(samples, r * 2 * self.fft_size));
        }
        rows
    }

    /// One FFT window starting at float offset `base` into the block.
    fn transform_row(&mut self, samples: &[f32], base: usize) -> MagnitudeRow {
        let n = self.fft_size;
        for j in 0..n {
            let mut re = samples.get(base + 2 * j).copied().unwrap_or(0.0) as f64;
            let mut im = samples.get(base + 2 * j + 1).copied().unwrap_or(0.0) as f64;
            // The window covers the first n float positions of the 2n-float
            // slice, so only the leading half of the complex samples is
            // weighted. Downstream scale thresholds are calibrated against
            // this layout.
            if 2 * j < n {
                re *= self.weights[2 * j];
            }
            if 2 * j + 1 < n {
                im *= self.weights[2 * j + 1];
            }
            self.buffer[j] = Complex64::new(re, im);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let norm = 1.0 / n as f64;
        let mut row: MagnitudeRow = self.buffer.iter().map(|c| c.norm() * norm).collect();
        // Swap halves so DC lands at the center (index n/2)
        row.rotate_left(n / 2);
        for v in row.iter_mut() {
            let db = 10.0 * v.log10();
            *v = if db.is_finite() { db } else { 0.0 };
        }
        row
    }
}

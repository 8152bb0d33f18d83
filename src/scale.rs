//! Magnitude Normalization and Auto-Scaling
//!
//! Maps dB magnitudes onto the 8-bit intensity range a colormap lookup
//! expects, and derives a usable (min, max) scale from the statistics of a
//! block's magnitude data when the caller requests auto-scaling.
//!
//! ```text
//! dB magnitudes → [(v - min) · 255/(max - min), clipped to 0..=255] → u8
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{RenderError, RenderResult};

/// A validated magnitude scale in dB.
///
/// `min` maps to intensity 0 and `max` to 255. Construct through
/// [`MagnitudeScale::new`] so degenerate scales (`min >= max`, NaN bounds)
/// are rejected before any rendering happens instead of producing an
/// inverted or divide-by-zero mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeScale {
    pub min: f64,
    pub max: f64,
}

impl MagnitudeScale {
    pub fn new(min: f64, max: f64) -> RenderResult<Self> {
        let scale = Self { min, max };
        scale.validate()?;
        Ok(scale)
    }

    /// Check the invariant `min < max` with both bounds finite.
    pub fn validate(&self) -> RenderResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(RenderError::InvalidScale {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Map one magnitude row onto 8-bit intensities.
    ///
    /// The mapping is monotonic; `min` maps to exactly 0 and `max` to
    /// exactly 255. Assumes a validated scale.
    pub fn normalize(&self, row: &[f64]) -> Vec<u8> {
        let span = 255.0 / (self.max - self.min);
        row.iter()
            .map(|&v| ((v - self.min) * span).clamp(0.0, 255.0).round() as u8)
            .collect()
    }

    /// Derive a scale from the mean and standard deviation of magnitude rows.
    ///
    /// `min = mean - 1.5σ`, `max = mean + 1.5σ`, each rounded to 3 decimal
    /// digits. A floor of 1 and ceiling of 255 are applied when the bounds
    /// stray outside the 8-bit intensity range, but only if the clamped
    /// bounds still form a valid scale. Magnitudes in dB sit far below 1, so
    /// clamping them would invert the scale; in that case the raw statistics
    /// are kept. (The floor is 1 rather than 0 because a lower bound of
    /// exactly 0 produced all-black renders in intensity-domain data; the
    /// workaround is preserved.)
    ///
    /// Statistics aggregate over every value in `rows`, not just the last
    /// row processed.
    pub fn autoscale<'a, I>(rows: I) -> RenderResult<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let mut count = 0usize;
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for row in rows {
            for &v in row {
                count += 1;
                sum += v;
                sum_sq += v * v;
            }
        }
        if count == 0 {
            return Err(RenderError::EmptyCapture);
        }
        let n = count as f64;
        let mean = sum / n;
        let var = (sum_sq / n - mean * mean).max(0.0);
        let std = var.sqrt();

        let lo = round3(mean - 1.5 * std);
        let hi = round3(mean + 1.5 * std);

        let clamped_lo = lo.max(1.0);
        let clamped_hi = hi.min(255.0);
        let (min, max) = if clamped_lo < clamped_hi {
            (clamped_lo, clamped_hi)
        } else {
            (lo, hi)
        };

        Self::new(min, max)
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_scales() {
        assert!(MagnitudeScale::new(-10.0, -10.0).is_err());
        assert!(MagnitudeScale::new(5.0, -5.0).is_err());
        assert!(MagnitudeScale::new(f64::NAN, 10.0).is_err());
        assert!(MagnitudeScale::new(-10.0, f64::NAN).is_err());
        assert!(MagnitudeScale::new(f64::NEG_INFINITY, 0.0).is_err());
        assert!(MagnitudeScale::new(-40.0, -10.0).is_ok());
    }

    #[test]
    fn test_normalize_endpoints_exact() {
        let scale = MagnitudeScale::new(-40.0, -10.0).unwrap();
        let out = scale.normalize(&[-40.0, -10.0]);
        assert_eq!(out, vec![0, 255]);
    }

    #[test]
    fn test_normalize_monotonic() {
        let scale = MagnitudeScale::new(-50.0, 0.0).unwrap();
        let values: Vec<f64> = (0..200).map(|i| -60.0 + i as f64 * 0.4).collect();
        let out = scale.normalize(&values);
        for pair in out.windows(2) {
            assert!(pair[0] <= pair[1], "normalize must be monotonic");
        }
    }

    #[test]
    fn test_normalize_clips_out_of_range() {
        let scale = MagnitudeScale::new(0.0, 10.0).unwrap();
        let out = scale.normalize(&[-100.0, 100.0]);
        assert_eq!(out, vec![0, 255]);
    }

    #[test]
    fn test_autoscale_db_domain() {
        // Values -25 and -15 in equal counts: mean -20, stddev 5, so the
        // derived scale is mean ± 1.5σ with no clamping (clamping dB-domain
        // statistics to [1, 255] would invert the scale).
        let row: Vec<f64> = [-25.0, -15.0].repeat(64);
        let scale = MagnitudeScale::autoscale([row.as_slice()]).unwrap();
        assert!((scale.min - -27.5).abs() < 1e-9, "min = {}", scale.min);
        assert!((scale.max - -12.5).abs() < 1e-9, "max = {}", scale.max);
    }

    #[test]
    fn test_autoscale_clamps_intensity_domain() {
        // Mean 128, stddev ~127.5: bounds stray outside [1, 255] and the
        // clamped bounds still form a valid scale, so the clamp applies.
        let row: Vec<f64> = [0.5, 255.5].repeat(32);
        let scale = MagnitudeScale::autoscale([row.as_slice()]).unwrap();
        assert_eq!(scale.min, 1.0);
        assert_eq!(scale.max, 255.0);
    }

    #[test]
    fn test_autoscale_rounds_to_3_decimals() {
        // mean -20.0001, stddev 5: raw bounds -27.5001 / -12.5001 round to
        // three decimal digits.
        let row: Vec<f64> = [-25.000_1, -15.000_1].repeat(64);
        let scale = MagnitudeScale::autoscale([row.as_slice()]).unwrap();
        assert!((scale.min - -27.5).abs() < 1e-9, "min = {}", scale.min);
        assert!((scale.max - -12.5).abs() < 1e-9, "max = {}", scale.max);
    }

    #[test]
    fn test_autoscale_constant_input_is_degenerate() {
        // Zero spread collapses min and max onto the mean; that is not a
        // usable scale and must surface as an error, not an inverted render.
        let row = vec![-20.0; 16];
        assert!(MagnitudeScale::autoscale([row.as_slice()]).is_err());
    }

    #[test]
    fn test_autoscale_aggregates_all_rows() {
        // Two rows with very different means: the result must reflect both,
        // not just the last row.
        let row_a = vec![-40.0; 32];
        let row_b = vec![-10.0; 32];
        let scale = MagnitudeScale::autoscale([row_a.as_slice(), row_b.as_slice()]).unwrap();
        // mean -25, stddev 15
        assert!((scale.min - -47.5).abs() < 1e-9, "min = {}", scale.min);
        assert!((scale.max - -2.5).abs() < 1e-9, "max = {}", scale.max);
    }

    #[test]
    fn test_autoscale_empty_input() {
        let rows: [&[f64]; 0] = [];
        assert_eq!(
            MagnitudeScale::autoscale(rows),
            Err(crate::types::RenderError::EmptyCapture)
        );
    }
}

//! Capture Overview (Minimap)
//!
//! A low-resolution spectrogram of the whole capture, rendered beside the
//! scrollbar. It runs the same transform/normalize/colorize chain as the
//! main view but at a fixed small FFT size over a decimated schedule of
//! sample offsets, so its row count stays near a constant budget no matter
//! how long the capture is.
//!
//! The minimap keeps its own color scale, the global (min, max) observed
//! across every sampled row, independent of whatever scale the main
//! viewport uses. Tick positions for the scrollbar handle and for
//! annotations are plain linear maps from sample offset to track pixels.

use log::debug;

use crate::annotations::Annotation;
use crate::colormap::{colorize, Colormap};
use crate::compositor::Raster;
use crate::scale::MagnitudeScale;
use crate::transform::BlockTransformer;
use crate::types::{MagnitudeRow, RenderError, RenderResult};
use crate::window::WindowKind;

/// FFT size of every minimap row; independent of the main view's size.
pub const MINIMAP_FFT_SIZE: usize = 64;

/// Sample budget the schedule decimates toward: the FFT windows it keeps
/// cover about this many complex samples in total.
const SAMPLE_BUDGET: u64 = 100_000;

/// Minimum scrollbar handle height in track pixels.
const MIN_HANDLE_PX: f64 = 10.0;

/// The decimated fetch schedule for one capture.
///
/// Each entry in `offsets` is the complex-sample offset of one FFT window
/// the caller must supply to [`MinimapGenerator::render`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimapPlan {
    pub fft_size: usize,
    /// FFT windows skipped between consecutive sampled ones.
    pub skip_ffts: u64,
    pub offsets: Vec<u64>,
}

impl MinimapPlan {
    pub fn new(total_samples: u64) -> RenderResult<Self> {
        if total_samples == 0 {
            return Err(RenderError::EmptyCapture);
        }
        let fft_size = MINIMAP_FFT_SIZE as u64;
        let skip_ffts = total_samples / SAMPLE_BUDGET;
        let stride = (skip_ffts + 1) * fft_size;
        let offsets: Vec<u64> = (0..)
            .map(|i| i * stride)
            .take_while(|&off| off < total_samples)
            .collect();
        debug!(
            "minimap schedule: {} rows, skipping {} ffts between rows",
            offsets.len(),
            skip_ffts
        );
        Ok(Self {
            fft_size: MINIMAP_FFT_SIZE,
            skip_ffts,
            offsets,
        })
    }

    /// Height of the minimap raster in rows.
    pub fn rows(&self) -> usize {
        self.offsets.len()
    }
}

/// A rendered overview raster and the global scale it used.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimap {
    pub raster: Raster,
    /// Global (min, max) magnitude across all sampled rows.
    pub scale: MagnitudeScale,
}

/// Renders the overview from the segments a plan asked for.
pub struct MinimapGenerator {
    transformer: BlockTransformer,
    colormap: Colormap,
}

impl MinimapGenerator {
    pub fn new(window: WindowKind, colormap: Colormap) -> RenderResult<Self> {
        let transformer =
            BlockTransformer::with_shape(MINIMAP_FFT_SIZE, MINIMAP_FFT_SIZE, window)?;
        Ok(Self {
            transformer,
            colormap,
        })
    }

    /// Render one raster row per supplied segment.
    ///
    /// Segments must arrive in plan order, each holding the
    /// `2 * MINIMAP_FFT_SIZE` interleaved floats at one planned offset
    /// (short segments at the end of a capture zero-pad). The color scale
    /// is the global min/max over every row; a flat capture falls back to
    /// a unit span so rendering still completes.
    pub fn render<'a, I>(&mut self, segments: I) -> RenderResult<Minimap>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let mut rows: Vec<MagnitudeRow> = Vec::new();
        for segment in segments {
            let mut transformed = self.transformer.transform(segment);
            rows.append(&mut transformed);
        }
        if rows.is_empty() {
            return Err(RenderError::EmptyCapture);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &rows {
            for &v in row {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min >= max {
            max = min + 1.0;
        }
        let scale = MagnitudeScale::new(min, max)?;

        let table = self.colormap.table();
        let width = MINIMAP_FFT_SIZE;
        let mut pixels = Vec::with_capacity(rows.len() * width * 4);
        for row in &rows {
            let intensities = scale.normalize(row);
            pixels.extend_from_slice(&colorize(&intensities, width, table));
        }
        Ok(Minimap {
            raster: Raster {
                pixels,
                width,
                height: rows.len(),
            },
            scale,
        })
    }
}

/// Track pixel for a sample offset: `offset · track_px / total_samples`.
pub fn tick_y(sample_offset: u64, track_px: f64, total_samples: u64) -> f64 {
    if total_samples == 0 {
        return 0.0;
    }
    sample_offset as f64 * track_px / total_samples as f64
}

/// Tick position and extent for one annotation, in track pixels.
pub fn annotation_tick(
    annotation: &Annotation,
    track_px: f64,
    total_samples: u64,
) -> (f64, f64) {
    let y = tick_y(annotation.sample_start, track_px, total_samples);
    let h = tick_y(annotation.sample_count, track_px, total_samples);
    (y, h)
}

/// Scrollbar handle height in track pixels for the current view.
///
/// Proportional to the fraction of the capture the viewport shows, with a
/// floor so the handle stays grabbable on long captures.
pub fn handle_height(
    viewport_rows: usize,
    zoom: usize,
    fft_size: usize,
    total_samples: u64,
    track_px: f64,
) -> f64 {
    if total_samples == 0 {
        return track_px;
    }
    let viewport_samples = (viewport_rows * zoom * fft_size) as f64;
    let h = viewport_samples / total_samples as f64 * track_px;
    h.max(MIN_HANDLE_PX).min(track_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone_segment(bin: usize) -> Vec<f32> {
        let n = MINIMAP_FFT_SIZE;
        let mut samples = Vec::with_capacity(2 * n);
        for i in 0..n {
            let phase = 2.0 * PI * bin as f64 * i as f64 / n as f64;
            samples.push((4.0 * phase.cos()) as f32);
            samples.push((4.0 * phase.sin()) as f32);
        }
        samples
    }

    #[test]
    fn test_plan_small_capture_keeps_every_fft() {
        let plan = MinimapPlan::new(64 * 1000).unwrap();
        assert_eq!(plan.skip_ffts, 0);
        assert_eq!(plan.rows(), 1000);
        assert_eq!(plan.offsets[1], 64);
    }

    #[test]
    fn test_plan_keeps_sampled_data_near_budget() {
        // 16M samples: skip 160 windows between kept ones
        let total = 64u64 * 250_000;
        let plan = MinimapPlan::new(total).unwrap();
        assert_eq!(plan.skip_ffts, 160);
        assert_eq!(plan.offsets[1] - plan.offsets[0], 161 * 64);
        assert!(*plan.offsets.last().unwrap() < total);

        // The kept windows together cover about the sample budget
        let sampled = plan.rows() as u64 * MINIMAP_FFT_SIZE as u64;
        assert!(
            sampled <= SAMPLE_BUDGET + MINIMAP_FFT_SIZE as u64,
            "sampled {sampled} must stay near the budget"
        );
        assert!(sampled > SAMPLE_BUDGET / 2, "sampled {sampled} is too sparse");
    }

    #[test]
    fn test_plan_row_count_independent_of_capture_length() {
        // Ten times the capture, roughly the same overview height
        let short = MinimapPlan::new(64 * 250_000).unwrap();
        let long = MinimapPlan::new(64 * 2_500_000).unwrap();
        let ratio = long.rows() as f64 / short.rows() as f64;
        assert!(
            (0.5..2.0).contains(&ratio),
            "rows {} vs {} must not scale with capture length",
            short.rows(),
            long.rows()
        );
    }

    #[test]
    fn test_plan_covers_tiny_capture() {
        // Shorter than one FFT window still yields one row (zero-padded)
        let plan = MinimapPlan::new(10).unwrap();
        assert_eq!(plan.rows(), 1);
        assert_eq!(plan.offsets[0], 0);
        assert!(MinimapPlan::new(0).is_err());
    }

    #[test]
    fn test_render_shape_and_scale() {
        let mut generator =
            MinimapGenerator::new(WindowKind::Hamming, Colormap::Viridis).unwrap();
        let a = tone_segment(5);
        let b = tone_segment(20);
        let minimap = generator.render([a.as_slice(), b.as_slice()]).unwrap();
        assert_eq!(minimap.raster.width, MINIMAP_FFT_SIZE);
        assert_eq!(minimap.raster.height, 2);
        assert!(minimap.scale.min < minimap.scale.max);
        // The global max must map some pixel to full intensity in each
        // tone's row
        assert!(minimap.scale.max > 0.0, "tone peak sits above 0 dB");
    }

    #[test]
    fn test_render_flat_capture_gets_unit_span() {
        let mut generator =
            MinimapGenerator::new(WindowKind::Rectangular, Colormap::Grayscale).unwrap();
        let zeros = vec![0.0f32; 2 * MINIMAP_FFT_SIZE];
        let minimap = generator.render([zeros.as_slice(), zeros.as_slice()]).unwrap();
        assert_eq!(minimap.scale.min, 0.0);
        assert_eq!(minimap.scale.max, 1.0);
        // Everything normalizes to intensity 0
        let black = Colormap::Grayscale.table()[0];
        assert!(minimap.raster.pixels.chunks(4).all(|px| px == black));
    }

    #[test]
    fn test_render_empty_is_an_error() {
        let mut generator =
            MinimapGenerator::new(WindowKind::Hamming, Colormap::Viridis).unwrap();
        assert_eq!(
            generator.render(std::iter::empty::<&[f32]>()),
            Err(RenderError::EmptyCapture)
        );
    }

    #[test]
    fn test_tick_linear_scaling() {
        assert_eq!(tick_y(0, 400.0, 1000), 0.0);
        assert_eq!(tick_y(500, 400.0, 1000), 200.0);
        assert_eq!(tick_y(1000, 400.0, 1000), 400.0);

        let ann = Annotation {
            sample_start: 250,
            sample_count: 100,
            freq_lower_edge: 0.0,
            freq_upper_edge: 0.0,
            label: String::new(),
        };
        let (y, h) = annotation_tick(&ann, 400.0, 1000);
        assert_eq!(y, 100.0);
        assert_eq!(h, 40.0);
    }

    #[test]
    fn test_handle_height_proportional_with_floor() {
        // Viewport covers half the capture
        let h = handle_height(8, 1, 64, 1024, 400.0);
        assert_eq!(h, 200.0);

        // A tiny viewport over a huge capture hits the floor
        let h = handle_height(8, 1, 64, 1_000_000_000, 400.0);
        assert_eq!(h, MIN_HANDLE_PX);

        // Never taller than the track
        let h = handle_height(1000, 4, 64, 1024, 400.0);
        assert_eq!(h, 400.0);
    }
}

//! # Waterfall Core Rendering Library
//!
//! This crate implements the tiled spectral-analysis and rendering pipeline
//! behind a scrollable spectrogram viewer for recorded I/Q captures. Captures
//! can be arbitrarily large; the pipeline only ever touches fixed-size sample
//! blocks, renders each block once, and composes viewports from cached tiles:
//!
//! - **Windowed FFT**: per-block spectral transform with five window choices
//! - **Normalization**: dB magnitudes to 8-bit intensity, fixed or auto scale
//! - **Colormaps**: shared 256-entry RGBA lookup tables
//! - **Tile Cache**: lazy, block-indexed, wholesale invalidation on
//!   parameter change
//! - **Compositor**: fractional viewports, zoom decimation, white filler
//!   for blocks still in flight
//! - **Minimap**: whole-capture overview at a fixed small FFT size
//! - **Annotations**: lossless sample-domain ↔ pixel-domain mapping
//!
//! ## Signal Flow
//!
//! ```text
//! blocks → window → FFT → |·| → dB → normalize → colorize → tile cache
//!                                                               │
//!            viewport [lower, upper) + zoom ──────► compositor ─┴► raster
//!                                                               + missing
//! ```
//!
//! The crate does no I/O and no scheduling. Callers fetch sample blocks
//! however they like, hand them to the cache, and recompose; blocks that
//! have not arrived render as filler and are reported back by index.
//!
//! ## Example
//!
//! ```rust,no_run
//! use waterfall_core::{compose, RenderParams, TileCache, Viewport, WindowKind};
//!
//! let params = RenderParams::builder()
//!     .fft_size(1024)
//!     .window(WindowKind::Hanning)
//!     .autoscale()
//!     .build()?;
//!
//! let mut cache = TileCache::new(params)?;
//! // cache.get_or_create(0, Some(&samples))? for each fetched block...
//!
//! let viewport = Viewport::new(0.0, 2.5, 1)?;
//! let composite = compose(&viewport, &cache)?;
//! // composite.raster is RGBA; composite.missing_blocks drives fetching
//! # Ok::<(), waterfall_core::RenderError>(())
//! ```

pub mod annotations;
pub mod colormap;
pub mod compositor;
pub mod minimap;
pub mod params;
pub mod scale;
pub mod tile_cache;
pub mod transform;
pub mod types;
pub mod window;

// Re-export main types
pub use annotations::{Annotation, PixelBounds, SampleBounds, ViewMapping};
pub use colormap::{colorize, Colormap, ColormapTable};
pub use compositor::{compose, Composite, Raster, Viewport};
pub use minimap::{Minimap, MinimapGenerator, MinimapPlan, MINIMAP_FFT_SIZE};
pub use params::{RenderParams, RenderParamsBuilder, ScaleMode};
pub use scale::MagnitudeScale;
pub use tile_cache::{Tile, TileCache, TileLookup};
pub use transform::BlockTransformer;
pub use types::{CaptureMetadata, Complex, IQSample, MagnitudeRow, RenderError, RenderResult};
pub use window::WindowKind;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::annotations::{Annotation, SampleBounds, ViewMapping};
    pub use crate::colormap::Colormap;
    pub use crate::compositor::{compose, Viewport};
    pub use crate::params::{RenderParams, ScaleMode};
    pub use crate::scale::MagnitudeScale;
    pub use crate::tile_cache::{TileCache, TileLookup};
    pub use crate::types::{CaptureMetadata, RenderError, RenderResult};
    pub use crate::window::WindowKind;
}

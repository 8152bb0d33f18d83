//! Block-Indexed Tile Cache
//!
//! Sparse store of rendered tiles, one per sample block. A tile is the
//! full stack of colorized pixel rows for one block under the parameters
//! the cache was built with. Tiles are created lazily the first time a
//! block's samples are both available and needed, and reused across every
//! later viewport that touches the block.
//!
//! The cache never fetches anything. When a block's samples have not been
//! supplied, lookup reports [`TileLookup::Missing`] and the caller decides
//! whether and when to fetch. Parameters (FFT size, window, scale,
//! colormap) are baked into stored pixels, so any parameter change requires
//! [`TileCache::invalidate_all`].

use log::debug;
use std::collections::HashMap;

use crate::colormap::{colorize, Colormap};
use crate::params::{RenderParams, ScaleMode};
use crate::scale::MagnitudeScale;
use crate::transform::BlockTransformer;
use crate::types::{MagnitudeRow, RenderResult};

/// Rendered pixel rows for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl Tile {
    fn new(pixels: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Width in pixels (the FFT size).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of pixel rows (the block's FFT row count).
    pub fn height(&self) -> usize {
        self.height
    }

    /// One pixel row as raw RGBA bytes.
    pub fn row(&self, index: usize) -> &[u8] {
        let stride = self.width * 4;
        &self.pixels[index * stride..(index + 1) * stride]
    }

    /// The whole tile as raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Outcome of a cache lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum TileLookup<'a> {
    /// The tile exists (found or just built).
    Cached(&'a Tile),
    /// No tile and no samples were supplied; the caller should fetch.
    Missing,
}

impl TileLookup<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Sparse cache of rendered tiles keyed by block index.
pub struct TileCache {
    params: RenderParams,
    transformer: BlockTransformer,
    resolved_scale: Option<MagnitudeScale>,
    tiles: HashMap<u64, Tile>,
}

impl TileCache {
    pub fn new(params: RenderParams) -> RenderResult<Self> {
        let transformer = BlockTransformer::new(&params)?;
        Ok(Self {
            params,
            transformer,
            resolved_scale: None,
            tiles: HashMap::new(),
        })
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// The scale tiles are currently rendered with.
    ///
    /// For a fixed scale this is immediate; in auto mode it is `None` until
    /// the first tile build resolves one from that block's statistics.
    pub fn effective_scale(&self) -> Option<MagnitudeScale> {
        match self.params.scale {
            ScaleMode::Fixed(scale) => Some(scale),
            ScaleMode::Auto => self.resolved_scale,
        }
    }

    /// Look up the tile for `block_index`, building it if samples are given.
    ///
    /// An existing tile is returned as-is; the samples argument is ignored
    /// in that case, which makes duplicate deliveries of the same block
    /// idempotent. Without a tile and without samples the result is
    /// [`TileLookup::Missing`].
    pub fn get_or_create(
        &mut self,
        block_index: u64,
        samples: Option<&[f32]>,
    ) -> RenderResult<TileLookup<'_>> {
        if !self.tiles.contains_key(&block_index) {
            let samples = match samples {
                Some(samples) => samples,
                None => return Ok(TileLookup::Missing),
            };
            let rows = self.transformer.transform(samples);
            let scale = self.resolve_scale(&rows)?;
            let tile = render_tile(&rows, scale, self.params.colormap, self.params.fft_size);
            debug!(
                "built tile for block {} ({} rows x {} bins)",
                block_index,
                tile.height(),
                tile.width()
            );
            self.tiles.insert(block_index, tile);
        }
        match self.tiles.get(&block_index) {
            Some(tile) => Ok(TileLookup::Cached(tile)),
            None => Ok(TileLookup::Missing),
        }
    }

    /// Look up without building.
    pub fn get(&self, block_index: u64) -> Option<&Tile> {
        self.tiles.get(&block_index)
    }

    pub fn contains(&self, block_index: u64) -> bool {
        self.tiles.contains_key(&block_index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Drop every tile and any auto-resolved scale.
    ///
    /// Callers must invoke this whenever FFT size, window, scale or
    /// colormap changes; stored tiles bake all four in.
    pub fn invalidate_all(&mut self) {
        debug!("invalidating {} cached tiles", self.tiles.len());
        self.tiles.clear();
        self.resolved_scale = None;
    }

    /// Replace the parameters and clear the cache in one step.
    pub fn set_params(&mut self, params: RenderParams) -> RenderResult<()> {
        self.transformer = BlockTransformer::new(&params)?;
        self.params = params;
        self.invalidate_all();
        Ok(())
    }

    fn resolve_scale(&mut self, rows: &[MagnitudeRow]) -> RenderResult<MagnitudeScale> {
        match self.params.scale {
            ScaleMode::Fixed(scale) => Ok(scale),
            ScaleMode::Auto => {
                if let Some(scale) = self.resolved_scale {
                    return Ok(scale);
                }
                let scale = MagnitudeScale::autoscale(rows.iter().map(|r| r.as_slice()))?;
                debug!("auto-scale resolved to [{}, {}]", scale.min, scale.max);
                self.resolved_scale = Some(scale);
                Ok(scale)
            }
        }
    }
}

fn render_tile(
    rows: &[MagnitudeRow],
    scale: MagnitudeScale,
    colormap: Colormap,
    width: usize,
) -> Tile {
    let table = colormap.table();
    let mut pixels = Vec::with_capacity(rows.len() * width * 4);
    for row in rows {
        let intensities = scale.normalize(row);
        pixels.extend_from_slice(&colorize(&intensities, width, table));
    }
    Tile::new(pixels, width, rows.len())
}

//! Colormap Rasterization
//!
//! Fixed 256-entry RGBA lookup tables, selected by name, plus the
//! per-element lookup that turns a row of 8-bit intensities into pixels.
//! Tables are built once and shared read-only across all consumers.
//!
//! Viridis and Jet use polynomial / piecewise channel fits; Plasma and
//! Inferno interpolate linearly between anchor samples of the reference
//! palettes. Grayscale is the identity ramp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::types::{RenderError, RenderResult};

/// One RGBA lookup table: 256 entries × 4 channels.
pub type ColormapTable = [[u8; 4]; 256];

/// Named colormap selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    Viridis,
    Plasma,
    Inferno,
    Jet,
    Grayscale,
}

impl Default for Colormap {
    fn default() -> Self {
        Self::Viridis
    }
}

impl Colormap {
    pub fn from_name(name: &str) -> RenderResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Ok(Self::Viridis),
            "plasma" => Ok(Self::Plasma),
            "inferno" => Ok(Self::Inferno),
            "jet" => Ok(Self::Jet),
            "grayscale" | "greyscale" | "gray" => Ok(Self::Grayscale),
            other => Err(RenderError::UnknownColormap(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Plasma => "plasma",
            Self::Inferno => "inferno",
            Self::Jet => "jet",
            Self::Grayscale => "grayscale",
        }
    }

    /// The shared lookup table for this colormap. Built on first use.
    pub fn table(&self) -> &'static ColormapTable {
        static VIRIDIS: OnceLock<ColormapTable> = OnceLock::new();
        static PLASMA: OnceLock<ColormapTable> = OnceLock::new();
        static INFERNO: OnceLock<ColormapTable> = OnceLock::new();
        static JET: OnceLock<ColormapTable> = OnceLock::new();
        static GRAYSCALE: OnceLock<ColormapTable> = OnceLock::new();

        match self {
            Self::Viridis => VIRIDIS.get_or_init(|| build_table(viridis_rgb)),
            Self::Plasma => PLASMA.get_or_init(|| build_table(plasma_rgb)),
            Self::Inferno => INFERNO.get_or_init(|| build_table(inferno_rgb)),
            Self::Jet => JET.get_or_init(|| build_table(jet_rgb)),
            Self::Grayscale => GRAYSCALE.get_or_init(|| build_table(|t| (t, t, t))),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a row of intensities onto RGBA pixels.
///
/// Output width is always `width` pixels (`width * 4` bytes). If the input
/// row is shorter than `width`, missing positions read as intensity 0
/// rather than going out of bounds. Alpha is forced opaque.
pub fn colorize(intensities: &[u8], width: usize, table: &ColormapTable) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * 4);
    for i in 0..width {
        let v = intensities.get(i).copied().unwrap_or(0);
        let rgba = &table[v as usize];
        pixels.extend_from_slice(&[rgba[0], rgba[1], rgba[2], 255]);
    }
    pixels
}

fn build_table(f: impl Fn(f64) -> (f64, f64, f64)) -> ColormapTable {
    let mut table = [[0u8; 4]; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let t = i as f64 / 255.0;
        let (r, g, b) = f(t);
        *entry = [channel(r), channel(g), channel(b), 255];
    }
    table
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

/// Polynomial approximation of the viridis colormap.
fn viridis_rgb(t: f64) -> (f64, f64, f64) {
    let r = 0.267 + 0.003 * t + 0.993 * t * t - 0.263 * t * t * t;
    let g = 0.004 + 0.874 * t - 0.523 * t * t + 0.645 * t * t * t;
    let b = 0.329 + 0.899 * t - 2.179 * t * t + 1.952 * t * t * t;
    (r, g, b)
}

/// Piecewise-linear jet (traditional waterfall colors).
fn jet_rgb(t: f64) -> (f64, f64, f64) {
    let r = if t < 0.35 {
        0.0
    } else if t < 0.66 {
        (t - 0.35) / 0.31
    } else if t < 0.89 {
        1.0
    } else {
        1.0 - (t - 0.89) / 0.11 * 0.5
    };

    let g = if t < 0.125 {
        0.0
    } else if t < 0.375 {
        (t - 0.125) / 0.25
    } else if t < 0.64 {
        1.0
    } else if t < 0.91 {
        1.0 - (t - 0.64) / 0.27
    } else {
        0.0
    };

    let b = if t < 0.11 {
        0.5 + t / 0.11 * 0.5
    } else if t < 0.34 {
        1.0
    } else if t < 0.65 {
        1.0 - (t - 0.34) / 0.31
    } else {
        0.0
    };

    (r, g, b)
}

const PLASMA_ANCHORS: [(f64, f64, f64); 5] = [
    (0.051, 0.031, 0.529),
    (0.494, 0.012, 0.659),
    (0.800, 0.278, 0.471),
    (0.973, 0.584, 0.251),
    (0.941, 0.976, 0.129),
];

const INFERNO_ANCHORS: [(f64, f64, f64); 5] = [
    (0.0, 0.0, 0.016),
    (0.341, 0.063, 0.431),
    (0.737, 0.216, 0.329),
    (0.976, 0.557, 0.035),
    (0.988, 1.0, 0.643),
];

fn plasma_rgb(t: f64) -> (f64, f64, f64) {
    interp_anchors(&PLASMA_ANCHORS, t)
}

fn inferno_rgb(t: f64) -> (f64, f64, f64) {
    interp_anchors(&INFERNO_ANCHORS, t)
}

fn interp_anchors(anchors: &[(f64, f64, f64)], t: f64) -> (f64, f64, f64) {
    let t = t.clamp(0.0, 1.0);
    let segments = (anchors.len() - 1) as f64;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(anchors.len() - 2);
    let frac = pos - idx as f64;
    let a = anchors[idx];
    let b = anchors[idx + 1];
    (
        a.0 + (b.0 - a.0) * frac,
        a.1 + (b.1 - a.1) * frac,
        a.2 + (b.2 - a.2) * frac,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Colormap::from_name("viridis").unwrap(), Colormap::Viridis);
        assert_eq!(Colormap::from_name("JET").unwrap(), Colormap::Jet);
        assert!(matches!(
            Colormap::from_name("rainbow"),
            Err(RenderError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_tables_are_opaque() {
        for map in [
            Colormap::Viridis,
            Colormap::Plasma,
            Colormap::Inferno,
            Colormap::Jet,
            Colormap::Grayscale,
        ] {
            let table = map.table();
            assert!(table.iter().all(|px| px[3] == 255), "{map} must be opaque");
        }
    }

    #[test]
    fn test_grayscale_is_identity_ramp() {
        let table = Colormap::Grayscale.table();
        assert_eq!(table[0], [0, 0, 0, 255]);
        assert_eq!(table[255], [255, 255, 255, 255]);
        assert_eq!(table[128][0], table[128][1]);
        assert_eq!(table[128][1], table[128][2]);
    }

    #[test]
    fn test_viridis_goes_dark_to_bright() {
        let table = Colormap::Viridis.table();
        // Viridis starts dark purple and ends bright yellow
        assert!(table[255][0] > table[0][0]);
        assert!(table[255][1] > table[0][1]);
    }

    #[test]
    fn test_table_is_shared() {
        let a = Colormap::Viridis.table() as *const ColormapTable;
        let b = Colormap::Viridis.table() as *const ColormapTable;
        assert_eq!(a, b, "table must be built once and shared");
    }

    #[test]
    fn test_colorize_zero_fills_short_rows() {
        let table = Colormap::Grayscale.table();
        let pixels = colorize(&[255, 255], 4, table);
        assert_eq!(pixels.len(), 16);
        assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
        // positions past the input read as intensity 0
        assert_eq!(&pixels[8..12], &[0, 0, 0, 255]);
        assert_eq!(&pixels[12..16], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_colorize_is_pure_lookup() {
        let table = Colormap::Jet.table();
        let pixels = colorize(&[0, 128, 255], 3, table);
        for (i, &v) in [0u8, 128, 255].iter().enumerate() {
            let expect = table[v as usize];
            assert_eq!(&pixels[i * 4..i * 4 + 3], &expect[..3]);
            assert_eq!(pixels[i * 4 + 3], 255);
        }
    }
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::raster::PixelBuffer;

/// Where a billboard's border thickness comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThicknessRepr", into = "ThicknessRepr")]
pub enum Thickness {
    /// A caller-supplied number of pixels
    Fixed(u32),
    /// Estimate it from the existing billboard with [`detect_border_thickness`]
    Detect,
}

impl Default for Thickness {
    fn default() -> Self {
        Thickness::Detect
    }
}

impl FromStr for Thickness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("detect") {
            return Ok(Thickness::Detect);
        }
        s.parse::<u32>()
            .map(Thickness::Fixed)
            .map_err(|_| format!("expected a pixel count or \"detect\", got \"{}\"", s))
    }
}

impl std::fmt::Display for Thickness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Thickness::Fixed(px) => write!(f, "{}px", px),
            Thickness::Detect => write!(f, "detect"),
        }
    }
}

// TOML accepts `thickness = 5` or `thickness = "detect"`
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ThicknessRepr {
    Pixels(u32),
    Keyword(String),
}

impl TryFrom<ThicknessRepr> for Thickness {
    type Error = String;

    fn try_from(repr: ThicknessRepr) -> Result<Self, Self::Error> {
        match repr {
            ThicknessRepr::Pixels(px) => Ok(Thickness::Fixed(px)),
            ThicknessRepr::Keyword(word) => word.parse(),
        }
    }
}

impl From<Thickness> for ThicknessRepr {
    fn from(thickness: Thickness) -> Self {
        match thickness {
            Thickness::Fixed(px) => ThicknessRepr::Pixels(px),
            Thickness::Detect => ThicknessRepr::Keyword("detect".to_string()),
        }
    }
}

/// Tunables for the border detection heuristic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Largest per-channel difference still counted as "same row"
    pub tolerance: u8,

    /// Lower clamp for the estimate
    pub min_thickness: u32,

    /// Upper clamp for the estimate
    pub max_thickness: u32,

    /// How many rows/columns to scan inward from each edge
    pub scan_limit: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            tolerance: 30,
            min_thickness: 5,
            max_thickness: 10,
            scan_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Largest thickness that still leaves a non-empty interior
pub fn max_valid_thickness(width: u32, height: u32) -> u32 {
    width.min(height).saturating_sub(1) / 2
}

/// Estimate a uniform border thickness for `buffer`.
///
/// Scans inward from each edge, comparing every row (or column) with the one
/// before it, and stops at the first one differing by more than
/// `params.tolerance` in any channel. The smallest of the four edge estimates
/// is clamped to `[min_thickness, max_thickness]` and then to what the buffer
/// can hold.
///
/// This is a best-effort estimate. It assumes a sharp, roughly uniform border;
/// gradient or anti-aliased frames make it stop early or run to the clamp.
pub fn detect_border_thickness(buffer: &PixelBuffer, params: &DetectionParams) -> u32 {
    let (width, height) = buffer.dimensions();
    let valid = max_valid_thickness(width, height);
    if valid == 0 {
        return 0;
    }

    let estimate = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right]
        .into_iter()
        .map(|edge| scan_edge(buffer, edge, params))
        .min()
        .unwrap_or(0);

    estimate
        .max(params.min_thickness)
        .min(params.max_thickness)
        .min(valid)
}

fn scan_edge(buffer: &PixelBuffer, edge: Edge, params: &DetectionParams) -> u32 {
    let depth = match edge {
        Edge::Top | Edge::Bottom => buffer.height(),
        Edge::Left | Edge::Right => buffer.width(),
    };
    let limit = params.scan_limit.min(depth / 2);

    (1..limit)
        .find(|&i| lines_differ(buffer, edge, i - 1, i, params.tolerance))
        .unwrap_or(limit)
}

fn lines_differ(buffer: &PixelBuffer, edge: Edge, a: u32, b: u32, tolerance: u8) -> bool {
    let (width, height) = buffer.dimensions();
    let length = match edge {
        Edge::Top | Edge::Bottom => width,
        Edge::Left | Edge::Right => height,
    };

    let coords = |depth: u32, along: u32| match edge {
        Edge::Top => (along, depth),
        Edge::Bottom => (along, height - 1 - depth),
        Edge::Left => (depth, along),
        Edge::Right => (width - 1 - depth, along),
    };

    (0..length).any(|along| {
        let (ax, ay) = coords(a, along);
        let (bx, by) = coords(b, along);
        let pa = buffer.get_pixel(ax, ay);
        let pb = buffer.get_pixel(bx, by);
        pa.iter().zip(pb.iter()).any(|(ca, cb)| ca.abs_diff(*cb) > tolerance)
    })
}

//! # Raster Primitives
//!
//! Pixel buffers, rectangles and the resize modes used to fit artwork into
//! billboard interiors.

pub mod resize;
pub mod types;

pub use resize::{fit_into, FitMode, RESAMPLE_FILTER};
pub use types::{PixelBuffer, Rect};

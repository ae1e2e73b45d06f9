use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::error::{PatcherError, Result};
use crate::raster::types::PixelBuffer;

/// Resampling filter used for every resize. Lanczos3 keeps downscaled logos
/// crisp without ringing badly on flat areas.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// How replacement artwork is fitted into a billboard interior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Resize to exactly the interior size, ignoring aspect ratio
    #[default]
    Stretch,
    /// Scale uniformly to fit, centered on a transparent canvas
    Letterbox,
}

/// Fit `source` into a `width` x `height` box according to `mode`
pub fn fit_into(source: &PixelBuffer, width: u32, height: u32, mode: FitMode) -> Result<PixelBuffer> {
    if source.is_empty() {
        return Err(PatcherError::invalid_dimensions("replacement image is empty"));
    }
    if width == 0 || height == 0 {
        return Err(PatcherError::invalid_dimensions(format!(
            "cannot fit content into a {}x{} area",
            width, height
        )));
    }

    match mode {
        FitMode::Stretch => Ok(resize_exact(source, width, height)),
        FitMode::Letterbox => Ok(letterbox(source, width, height)),
    }
}

/// Resize to an exact size with the shared resampling filter
pub fn resize_exact(source: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if source.dimensions() == (width, height) {
        return source.clone();
    }
    PixelBuffer::new(imageops::resize(source.as_image(), width, height, RESAMPLE_FILTER))
}

/// Dimensions of `source` scaled by `min(box_w / src_w, box_h / src_h)`
pub fn letterbox_size(source: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let scale = f64::min(width as f64 / src_w as f64, height as f64 / src_h as f64);

    let scaled_w = ((src_w as f64 * scale).floor() as u32).clamp(1, width);
    let scaled_h = ((src_h as f64 * scale).floor() as u32).clamp(1, height);
    (scaled_w, scaled_h)
}

fn letterbox(source: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    let (scaled_w, scaled_h) = letterbox_size(source.dimensions(), width, height);
    let scaled = resize_exact(source, scaled_w, scaled_h);

    let mut canvas = PixelBuffer::new_transparent(width, height);
    canvas.composite_over(&scaled, (width - scaled_w) / 2, (height - scaled_h) / 2);
    canvas
}

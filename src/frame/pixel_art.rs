use crate::{
    error::Result,
    frame::traits::{FrameSettings, FrameStyle},
    raster::PixelBuffer,
};

/// Per-channel offset for the darker outer band
const OUTER_SHADE: u8 = 40;
/// Per-channel offset for the corner highlights
const HIGHLIGHT: u8 = 30;
/// Side length of each corner highlight square
const CORNER_SIZE: u32 = 3;

/// Draws a fresh two-tone pixel-art frame instead of keeping the old one
///
/// The outer half of the ring is the base color darkened, the inner half the
/// base color itself, with a small lighter square in each corner. The
/// interior is left transparent.
pub struct PixelArtFrame;

impl PixelArtFrame {
    pub fn new() -> Self {
        Self
    }

    fn shade(color: [u8; 4], amount: u8, lighten: bool) -> [u8; 4] {
        let adjust = |c: u8| {
            if lighten {
                c.saturating_add(amount)
            } else {
                c.saturating_sub(amount)
            }
        };
        [adjust(color[0]), adjust(color[1]), adjust(color[2]), 255]
    }

    /// Render a `width` x `height` frame with a ring of `thickness` pixels
    pub fn render(width: u32, height: u32, thickness: u32, color: [u8; 4]) -> PixelBuffer {
        let mut frame = PixelBuffer::new_transparent(width, height);
        if thickness == 0 || width == 0 || height == 0 {
            return frame;
        }

        let outer = Self::shade(color, OUTER_SHADE, false);
        let highlight = Self::shade(color, HIGHLIGHT, true);
        let outer_band = (thickness + 1) / 2;
        let corner = CORNER_SIZE.min(thickness);

        for y in 0..height {
            for x in 0..width {
                // distance to the nearest edge
                let depth = x.min(y).min(width - 1 - x).min(height - 1 - y);
                if depth >= thickness {
                    continue;
                }

                let near_x = x < corner || x >= width.saturating_sub(corner);
                let near_y = y < corner || y >= height.saturating_sub(corner);
                let pixel = if near_x && near_y {
                    highlight
                } else if depth < outer_band {
                    outer
                } else {
                    color
                };
                frame.set_pixel(x, y, pixel);
            }
        }
        frame
    }
}

impl Default for PixelArtFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStyle for PixelArtFrame {
    fn name(&self) -> &str {
        "pixel-art"
    }

    fn description(&self) -> &str {
        "Draw a new two-tone pixel-art frame with highlighted corners"
    }

    fn reference(&self, existing: &PixelBuffer, thickness: u32, settings: &FrameSettings) -> Result<PixelBuffer> {
        let (width, height) = existing.dimensions();
        Ok(Self::render(width, height, thickness, settings.color))
    }
}

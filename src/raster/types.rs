use image::{ImageBuffer, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PatcherError, Result};

/// An RGBA8 pixel grid
///
/// Thin wrapper around an RGBA image buffer with the handful of operations the
/// compositor and atlas need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    buffer: RgbaImage,
}

impl PixelBuffer {
    /// Wrap an existing RGBA image buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    /// Create a fully transparent buffer of the given size
    pub fn new_transparent(width: u32, height: u32) -> Self {
        Self { buffer: ImageBuffer::new(width, height) }
    }

    /// Create a buffer filled with a single color
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba(color));
        Self { buffer }
    }

    /// Decode any supported image file into RGBA8
    ///
    /// The format is sniffed from the file contents, so backups and files with
    /// odd extensions load too.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::io::Reader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| PatcherError::missing_input(path, e))?
            .decode()
            .map_err(|e| PatcherError::missing_input(path, e))?;
        Ok(Self { buffer: image.to_rgba8() })
    }

    /// Save as PNG, keeping the alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.buffer
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| PatcherError::Encode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.buffer.put_pixel(x, y, Rgba(color));
    }

    /// Copy out a sub-rectangle. The rectangle must lie inside the buffer.
    pub fn crop(&self, rect: &Rect) -> Result<Self> {
        if !rect.fits_within(self.width(), self.height()) {
            return Err(PatcherError::invalid_dimensions(format!(
                "{} does not fit inside a {}x{} image",
                rect,
                self.width(),
                self.height()
            )));
        }
        let view = image::imageops::crop_imm(&self.buffer, rect.x, rect.y, rect.width, rect.height);
        Ok(Self { buffer: view.to_image() })
    }

    /// Alpha-composite `top` over this buffer with its top-left corner at (x, y)
    ///
    /// Source-over with rounded integer math. Opaque source pixels are copied
    /// as-is and fully transparent ones are skipped. Parts of `top` falling
    /// outside this buffer are clipped.
    pub fn composite_over(&mut self, top: &PixelBuffer, x: u32, y: u32) {
        let cols = top.width().min(self.width().saturating_sub(x));
        let rows = top.height().min(self.height().saturating_sub(y));

        for ty in 0..rows {
            for tx in 0..cols {
                let src = top.buffer.get_pixel(tx, ty).0;
                match src[3] {
                    0 => {}
                    255 => self.buffer.put_pixel(x + tx, y + ty, Rgba(src)),
                    _ => {
                        let dst = self.buffer.get_pixel(x + tx, y + ty).0;
                        self.buffer.put_pixel(x + tx, y + ty, Rgba(blend_over(src, dst)));
                    }
                }
            }
        }
    }

    /// Overwrite the pixels under `top`, alpha included, with no blending
    pub fn paste(&mut self, top: &PixelBuffer, x: u32, y: u32) {
        image::imageops::replace(&mut self.buffer, &top.buffer, x as i64, y as i64);
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_raw()
    }
}

/// Source-over for one pixel, channels rounded to nearest
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    let dst_weight = da * (255 - sa);
    // output alpha scaled by 255
    let alpha = sa * 255 + dst_weight;
    if alpha == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = src[c] as u32 * sa * 255 + dst[c] as u32 * dst_weight;
        out[c] = ((value + alpha / 2) / alpha) as u8;
    }
    out[3] = ((alpha + 127) / 255) as u8;
    out
}

/// Axis-aligned rectangle in atlas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies entirely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

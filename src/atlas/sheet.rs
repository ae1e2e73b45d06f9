use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::error::{PatcherError, Result};
use crate::raster::{PixelBuffer, Rect};

/// A spritesheet loaded from disk
///
/// Patches overwrite the pixels under their rectangle, alpha included. The
/// compositor has already blended the artwork over the billboard, so blending
/// again here would thicken semi-transparent frames on every run.
#[derive(Debug, Clone)]
pub struct Atlas {
    path: PathBuf,
    buffer: PixelBuffer,
}

impl Atlas {
    /// Load an atlas from an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = PixelBuffer::open(path)?;
        debug!("Loaded atlas {:?} ({}x{})", path, buffer.width(), buffer.height());
        Ok(Self {
            path: path.to_path_buf(),
            buffer,
        })
    }

    /// Wrap an in-memory buffer that will be saved to `path`
    pub fn from_buffer<P: Into<PathBuf>>(path: P, buffer: PixelBuffer) -> Self {
        Self {
            path: path.into(),
            buffer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Copy out the pixels under `rect`
    pub fn region(&self, rect: &Rect) -> Result<PixelBuffer> {
        self.buffer.crop(rect)
    }

    /// Overwrite the atlas at the rectangle's offset with `patch`
    pub fn apply_patch(&mut self, rect: &Rect, patch: &PixelBuffer) -> Result<()> {
        if patch.dimensions() != (rect.width, rect.height) {
            return Err(PatcherError::invalid_dimensions(format!(
                "patch is {}x{} but the target is {}",
                patch.width(),
                patch.height(),
                rect
            )));
        }

        let (width, height) = self.dimensions();
        if !rect.fits_within(width, height) {
            return Err(PatcherError::invalid_dimensions(format!(
                "{} does not fit inside the {}x{} atlas {:?}",
                rect, width, height, self.path
            )));
        }

        self.buffer.paste(patch, rect.x, rect.y);
        Ok(())
    }

    /// Write the atlas back to where it was loaded from, as PNG
    pub fn save(&self) -> Result<()> {
        self.buffer.save_png(&self.path)?;
        info!("Saved {:?}", self.path);
        Ok(())
    }

    /// Copy the on-disk file to `<name>.<timestamp>.bak` next to it
    pub fn backup(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "atlas".to_string());
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let backup_path = self.path.with_file_name(format!("{}.{}.bak", file_name, stamp));

        std::fs::copy(&self.path, &backup_path)?;
        info!("Backed up {:?} to {:?}", self.path, backup_path);
        Ok(backup_path)
    }
}

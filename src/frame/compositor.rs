use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{PatcherError, Result},
    frame::thickness::{detect_border_thickness, DetectionParams, Thickness},
    raster::{fit_into, FitMode, PixelBuffer},
};

/// What shows through transparent parts of the replacement artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    /// The reference billboard's own interior
    #[default]
    Reference,
    /// Nothing; the interior starts fully transparent
    Transparent,
}

/// Frame-preserving compositor
///
/// Produces a billboard the size of the reference buffer whose interior shows
/// the replacement artwork and whose border ring is copied verbatim from the
/// reference. The interior is pasted first and the ring laid over it
/// afterwards, so the frame always wins at the seam.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    fit: FitMode,
    backdrop: Backdrop,
    detection: DetectionParams,
}

impl FrameCompositor {
    pub fn new(fit: FitMode, backdrop: Backdrop, detection: DetectionParams) -> Self {
        Self { fit, backdrop, detection }
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit
    }

    /// Turn a thickness source into a pixel count for `existing`
    pub fn resolve_thickness(&self, existing: &PixelBuffer, thickness: Thickness) -> u32 {
        match thickness {
            Thickness::Fixed(px) => px,
            Thickness::Detect => {
                let detected = detect_border_thickness(existing, &self.detection);
                debug!("Detected border thickness: {}px", detected);
                detected
            }
        }
    }

    /// Composite `replacement` into the frame of `reference`
    ///
    /// Fails with `InvalidDimensions` when `thickness` leaves no interior or
    /// either buffer is empty.
    pub fn composite(
        &self,
        reference: &PixelBuffer,
        replacement: &PixelBuffer,
        thickness: u32,
    ) -> Result<PixelBuffer> {
        let (width, height) = reference.dimensions();
        if reference.is_empty() {
            return Err(PatcherError::invalid_dimensions(format!(
                "reference billboard is {}x{}",
                width, height
            )));
        }

        let ring = thickness as u64 * 2;
        if ring >= width as u64 || ring >= height as u64 {
            return Err(PatcherError::invalid_dimensions(format!(
                "border of {}px leaves no interior in a {}x{} billboard",
                thickness, width, height
            )));
        }

        let interior_w = width - thickness * 2;
        let interior_h = height - thickness * 2;
        let interior = fit_into(replacement, interior_w, interior_h, self.fit)?;

        let mut output = match self.backdrop {
            Backdrop::Reference => reference.clone(),
            Backdrop::Transparent => PixelBuffer::new_transparent(width, height),
        };
        output.composite_over(&interior, thickness, thickness);

        if thickness > 0 {
            restore_ring(&mut output, reference, thickness);
        }

        Ok(output)
    }
}

impl Default for FrameCompositor {
    fn default() -> Self {
        Self::new(FitMode::default(), Backdrop::default(), DetectionParams::default())
    }
}

/// Copy every pixel within `thickness` of an edge from `reference`
fn restore_ring(output: &mut PixelBuffer, reference: &PixelBuffer, thickness: u32) {
    let (width, height) = reference.dimensions();
    for y in 0..height {
        let in_band = y < thickness || y >= height - thickness;
        for x in 0..width {
            if in_band || x < thickness || x >= width - thickness {
                output.set_pixel(x, y, reference.get_pixel(x, y));
            }
        }
    }
}

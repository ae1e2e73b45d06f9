use crate::{
    error::Result,
    frame::traits::{FrameSettings, FrameStyle},
    raster::PixelBuffer,
};

/// Keeps whatever frame the billboard already has
pub struct ReferenceFrame;

impl ReferenceFrame {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStyle for ReferenceFrame {
    fn name(&self) -> &str {
        "reference"
    }

    fn description(&self) -> &str {
        "Preserve the existing billboard frame"
    }

    fn reference(&self, existing: &PixelBuffer, _thickness: u32, _settings: &FrameSettings) -> Result<PixelBuffer> {
        Ok(existing.clone())
    }
}

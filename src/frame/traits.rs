use serde::{Deserialize, Serialize};

use crate::{error::Result, frame::thickness::Thickness, raster::PixelBuffer};

/// A way of producing the frame ring that survives a content swap
pub trait FrameStyle: Send + Sync {
    /// Returns the unique name of this style
    fn name(&self) -> &str;

    /// Returns a human-readable description of this style
    fn description(&self) -> &str;

    /// Build the reference buffer whose outer `thickness` pixels become the
    /// billboard frame
    ///
    /// # Arguments
    ///
    /// * `existing` - The billboard as it currently appears in the atlas
    /// * `thickness` - Resolved border thickness in pixels
    /// * `settings` - Frame settings from the configuration
    ///
    /// The returned buffer must have the same dimensions as `existing`.
    fn reference(&self, existing: &PixelBuffer, thickness: u32, settings: &FrameSettings) -> Result<PixelBuffer>;
}

/// Frame settings shared by every style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Registered frame style name
    pub style: String,

    /// Fixed thickness or "detect"
    pub thickness: Thickness,

    /// Base RGBA color for synthesized frames
    pub color: [u8; 4],
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            style: "reference".to_string(),
            thickness: Thickness::Detect,
            color: [180, 160, 120, 255],
        }
    }
}

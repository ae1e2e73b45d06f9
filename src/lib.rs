//! # Billboard Patcher
//!
//! Replace the artwork on billboards baked into a game spritesheet while
//! keeping each billboard's decorative frame.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use billboard_patcher::{Config, PatchEngine, PatchJob};
//!
//! # fn main() -> billboard_patcher::Result<()> {
//! let config = Config::default();
//! let atlases = config.targets.atlases.clone();
//! let engine = PatchEngine::from_config(config)?;
//!
//! let report = engine.run(
//!     &[
//!         PatchJob::new("tools/invopay.png", "BILLBOARD06"),
//!         PatchJob::new("tools/faucet.png", "BILLBOARD07"),
//!     ],
//!     &atlases,
//! )?;
//! println!("{} billboard(s) updated", report.applied);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`raster`] - Pixel buffers, rectangles and interior resize modes
//! - [`frame`] - Border detection, the frame-preserving compositor, frame styles
//! - [`atlas`] - Loading, patching, extracting and backing up spritesheets
//! - [`patcher`] - The batch engine tying it together
//! - [`config`] - Billboard table and tunables, loaded from TOML
//!
//! ## Custom Frame Styles
//!
//! Implement [`FrameStyle`](frame::FrameStyle) to decide where the frame ring
//! comes from:
//!
//! ```rust,no_run
//! use billboard_patcher::frame::{FrameSettings, FrameStyle};
//! use billboard_patcher::raster::PixelBuffer;
//! use billboard_patcher::Result;
//!
//! struct SolidFrame;
//!
//! impl FrameStyle for SolidFrame {
//!     fn name(&self) -> &str {
//!         "solid"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Single-color frame"
//!     }
//!
//!     fn reference(&self, existing: &PixelBuffer, _thickness: u32, settings: &FrameSettings) -> Result<PixelBuffer> {
//!         Ok(PixelBuffer::new_filled(existing.width(), existing.height(), settings.color))
//!     }
//! }
//! ```

pub mod atlas;
pub mod config;
pub mod error;
pub mod frame;
pub mod patcher;
pub mod raster;

// Re-export commonly used types for convenience
pub use crate::{
    atlas::Atlas,
    config::Config,
    error::{PatcherError, Result},
    frame::{FrameCompositor, FrameStyle, FrameStyleRegistry, Thickness},
    patcher::{PatchEngine, PatchJob, PatchReport},
    raster::{PixelBuffer, Rect},
};

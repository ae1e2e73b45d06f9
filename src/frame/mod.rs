//! # Frame Handling
//!
//! Border thickness estimation, the frame-preserving compositor, and the
//! styles that decide where a billboard's frame ring comes from.
//!
//! ## Built-in Styles
//!
//! - **reference**: keep the frame the billboard already has
//! - **pixel-art**: draw a synthesized two-tone frame
//!
//! ## Usage
//!
//! ```rust,no_run
//! use billboard_patcher::frame::{FrameCompositor, FrameSettings, FrameStyleRegistry, Thickness};
//! use billboard_patcher::raster::PixelBuffer;
//!
//! # fn main() -> billboard_patcher::Result<()> {
//! let existing = PixelBuffer::open("extracted/BILLBOARD06.png")?;
//! let artwork = PixelBuffer::open("invopay.png")?;
//!
//! let compositor = FrameCompositor::default();
//! let style = FrameStyleRegistry::new().get_style("reference").unwrap();
//!
//! let thickness = compositor.resolve_thickness(&existing, Thickness::Detect);
//! let reference = style.reference(&existing, thickness, &FrameSettings::default())?;
//! let billboard = compositor.composite(&reference, &artwork, thickness)?;
//! billboard.save_png("BILLBOARD06.png")?;
//! # Ok(())
//! # }
//! ```

pub mod compositor;
pub mod pixel_art;
pub mod reference;
pub mod registry;
pub mod thickness;
pub mod traits;

pub use compositor::{Backdrop, FrameCompositor};
pub use pixel_art::PixelArtFrame;
pub use reference::ReferenceFrame;
pub use registry::FrameStyleRegistry;
pub use thickness::{detect_border_thickness, max_valid_thickness, DetectionParams, Thickness};
pub use traits::{FrameSettings, FrameStyle};

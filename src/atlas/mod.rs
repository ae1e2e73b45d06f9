//! # Atlas Handling
//!
//! Loading and saving spritesheets, pulling billboard regions out of them, and
//! compositing patched billboards back in.

pub mod extract;
pub mod sheet;

pub use extract::extract_billboards;
pub use sheet::Atlas;

//! # Patch Engine
//!
//! Runs content-to-billboard jobs against one or more atlas files, skipping
//! what cannot be patched and reporting what happened.

pub mod engine;
pub mod job;

// Re-exports for convenience
pub use engine::PatchEngine;
pub use job::{JobFailure, PatchJob, PatchReport};

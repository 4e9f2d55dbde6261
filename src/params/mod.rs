//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants of the narration visualiser live here with:
//! - Units (samples, seconds, scene units, radians)
//! - Documented ranges and meanings
//! - A `validate()` per struct

mod audio;
mod render;
mod shape;

// Re-export all types
pub use audio::{AnalysisConfig, DecoderBackend, DecoderConfig};
pub use render::SceneTiming;
pub use shape::{DeformMapping, ShapeConfig};

//! Reactive polygon geometry and audio-driven deformation.

mod deform;
mod polygon;

// Re-export public types
pub use deform::{scale_radially, Deformation, ShapeDeformer};
pub use polygon::{square_perimeter, Polygon, ReactiveShape};

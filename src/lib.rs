//! Voiceshape library - Audio-reactive polygons driven by narration
//!
//! Decodes a narration track once, then on every animation frame analyses
//! the spectrum under the playback clock and deforms a polygon to match.

pub mod audio;
pub mod error;
pub mod frame;
pub mod params;
pub mod shape;

pub use error::{VizError, VizResult};

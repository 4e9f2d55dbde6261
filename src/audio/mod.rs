//! Narration decoding and spectral analysis.
//!
//! Decodes the narration track once, then extracts a normalized band set
//! for any instant of playback.

mod bands;
mod buffer;
mod decoder;
mod fft;

// Re-export public types
pub use bands::{map_bands, BandSet};
pub use buffer::AudioBuffer;
pub use decoder::{decode_file, AudioDecoder};
pub use fft::{window_bounds, SpectralAnalyzer, Spectrum};

//! Audio decoding and spectral analysis configuration.

use std::path::PathBuf;

use crate::error::{VizError, VizResult};

/// Spectral analysis configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Nominal FFT window length (samples)
    /// Clamped per frame when the window runs past the end of the track.
    /// Any length is accepted, powers of two are fastest.
    pub window_size: usize,

    /// Upper bound on the number of frequency bands per frame
    /// The effective count is also capped by the vertex count and spectrum length.
    pub max_bands: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            max_bands: 40,
        }
    }
}

impl AnalysisConfig {
    /// Number of bands to request for a shape with `vertex_count` vertices
    pub fn bands_for(&self, vertex_count: usize) -> usize {
        vertex_count.min(self.max_bands)
    }

    /// Validate configuration (window must hold at least one spectrum bin, etc.)
    pub fn validate(&self) -> VizResult<()> {
        if self.window_size < 2 {
            return Err(VizError::invalid_config(format!(
                "window size must be at least 2 samples, got {}",
                self.window_size
            )));
        }
        if self.max_bands == 0 {
            return Err(VizError::invalid_config("max bands must be > 0"));
        }
        Ok(())
    }
}

/// How compressed narration audio is turned into PCM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecoderBackend {
    /// In-process decoding (hound for WAV, symphonia for everything else)
    #[default]
    Native,

    /// Transcode through the `ffmpeg` tool into a scoped temporary WAV
    Ffmpeg,
}

/// Audio decoder configuration
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    pub backend: DecoderBackend,

    /// Directory for intermediate files (system temp dir when `None`)
    pub temp_dir: Option<PathBuf>,
}

impl DecoderConfig {
    /// Validate configuration (temp dir must exist when given)
    pub fn validate(&self) -> VizResult<()> {
        if let Some(dir) = &self.temp_dir {
            if !dir.is_dir() {
                return Err(VizError::invalid_config(format!(
                    "temp dir is not a directory: {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

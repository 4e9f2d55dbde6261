//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use voiceshape::params::{
    AnalysisConfig, DecoderBackend, DecoderConfig, DeformMapping, SceneTiming, ShapeConfig,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "voiceshape", version)]
#[command(about = "Bake an audio-reactive polygon track from a narration file", long_about = None)]
pub struct Args {
    /// Narration audio file (MP3, WAV, AAC/M4A, FLAC, OGG)
    pub audio: PathBuf,

    /// Write the frame track JSON here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Frame rate of the baked track
    #[arg(long, default_value = "60")]
    pub fps: u32,

    /// Clock reading at which narration starts (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    pub start: f64,

    /// Hold after narration ends (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "1")]
    pub hold: f64,

    /// Points around the square perimeter
    #[arg(long, default_value = "150")]
    pub points: usize,

    /// Side length of the rest square
    #[arg(long, default_value = "2")]
    pub side_length: f32,

    /// FFT window size (samples)
    #[arg(long, default_value = "1024")]
    pub window_size: usize,

    /// Maximum number of frequency bands
    #[arg(long, default_value = "40")]
    pub max_bands: usize,

    /// Radial scale per unit band intensity
    #[arg(long, default_value = "0.5")]
    pub scale: f32,

    /// Decode through ffmpeg instead of the built-in decoders
    #[arg(long)]
    pub ffmpeg: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            backend: if self.ffmpeg {
                DecoderBackend::Ffmpeg
            } else {
                DecoderBackend::Native
            },
            temp_dir: None,
        }
    }

    pub fn shape_config(&self) -> ShapeConfig {
        ShapeConfig {
            num_points: self.points,
            side_length: self.side_length,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            window_size: self.window_size,
            max_bands: self.max_bands,
        }
    }

    pub fn deform_mapping(&self) -> DeformMapping {
        DeformMapping {
            scale_coefficient: self.scale,
            ..Default::default()
        }
    }

    pub fn scene_timing(&self) -> SceneTiming {
        SceneTiming {
            fps: self.fps,
            narration_start_s: self.start,
            hold_after_s: self.hold,
        }
    }
}

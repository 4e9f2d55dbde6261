//! Per-frame orchestration: clock -> spectrum -> bands -> deformation.

use std::sync::Arc;

use glam::Vec3;
use tracing::{info, trace};

use crate::audio::{map_bands, AudioBuffer, BandSet, SpectralAnalyzer};
use crate::error::{VizError, VizResult};
use crate::params::{AnalysisConfig, DeformMapping};
use crate::shape::{ReactiveShape, ShapeDeformer};

/// Everything a frame needs to know about the running narration
#[derive(Debug, Clone)]
pub struct NarrationContext {
    buffer: Arc<AudioBuffer>,
    /// Clock reading when narration playback began (seconds)
    start_time_s: f64,
    sample_rate: u32,
}

impl NarrationContext {
    pub fn new(buffer: Arc<AudioBuffer>, start_time_s: f64) -> Self {
        let sample_rate = buffer.sample_rate();
        Self {
            buffer,
            start_time_s,
            sample_rate,
        }
    }

    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }

    pub fn start_time_s(&self) -> f64 {
        self.start_time_s
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds of narration elapsed at clock reading `clock_now_s`
    pub fn elapsed_s(&self, clock_now_s: f64) -> f64 {
        clock_now_s - self.start_time_s
    }
}

/// Why a frame left the shape untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Elapsed time is zero or negative
    BeforeStart,
    /// Elapsed time reached the end of the track
    PastEnd,
    /// Nothing left to analyse at the window start
    EmptyWindow,
    /// Spectrum too short to form a single band
    NoBands,
}

/// Result of one driver tick
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Shape geometry replaced and rotated
    Updated { rotation_delta: f32, bands: BandSet },
    /// Frame absorbed without touching the shape
    Skipped(SkipReason),
    /// Driver not attached; callback would not have run
    Inactive,
}

impl FrameOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Lifecycle of the per-frame callback
#[derive(Debug, Clone)]
pub enum DriverState {
    Idle,
    Active(NarrationContext),
    Detached,
}

/// Drives an audio-reactive shape once per rendered frame
pub struct FrameDriver {
    state: DriverState,
    /// Rest geometry, fixed at construction
    original: Vec<Vec3>,
    analysis: AnalysisConfig,
    analyzer: SpectralAnalyzer,
    deformer: ShapeDeformer,
}

impl FrameDriver {
    /// Create an idle driver for shapes whose rest geometry is `original`
    pub fn new(
        original: Vec<Vec3>,
        analysis: AnalysisConfig,
        mapping: DeformMapping,
    ) -> VizResult<Self> {
        analysis.validate()?;
        mapping.validate()?;
        Ok(Self {
            state: DriverState::Idle,
            original,
            analysis,
            analyzer: SpectralAnalyzer::new(),
            deformer: ShapeDeformer::new(mapping),
        })
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DriverState::Active(_))
    }

    pub fn original_vertices(&self) -> &[Vec3] {
        &self.original
    }

    /// Register for frame callbacks (`Idle -> Active`)
    pub fn attach(&mut self, context: NarrationContext) -> VizResult<()> {
        match self.state {
            DriverState::Idle => {
                info!(
                    start_time_s = context.start_time_s(),
                    duration_s = context.buffer().duration_s(),
                    vertices = self.original.len(),
                    "frame driver attached"
                );
                self.state = DriverState::Active(context);
                Ok(())
            }
            DriverState::Active(_) => Err(VizError::lifecycle("driver is already attached")),
            DriverState::Detached => Err(VizError::lifecycle("driver was already detached")),
        }
    }

    /// Stop frame callbacks (`Active -> Detached`); the shape keeps its last geometry
    pub fn detach(&mut self) -> VizResult<()> {
        match self.state {
            DriverState::Active(_) => {
                info!("frame driver detached");
                self.state = DriverState::Detached;
                Ok(())
            }
            DriverState::Idle => Err(VizError::lifecycle("driver was never attached")),
            DriverState::Detached => Err(VizError::lifecycle("driver was already detached")),
        }
    }

    /// Run one frame at clock reading `clock_now_s`
    ///
    /// On success the shape's vertex list is replaced with the deformed rest
    /// geometry and the rotation delta is added to its orientation.
    pub fn tick<S: ReactiveShape + ?Sized>(
        &mut self,
        clock_now_s: f64,
        shape: &mut S,
    ) -> FrameOutcome {
        let DriverState::Active(context) = &self.state else {
            return FrameOutcome::Inactive;
        };

        let t_s = context.elapsed_s(clock_now_s);
        let buffer = context.buffer();
        if t_s.is_nan() || t_s <= 0.0 {
            trace!(t_s, "skip frame: before narration start");
            return FrameOutcome::Skipped(SkipReason::BeforeStart);
        }
        if t_s >= buffer.duration_s() {
            trace!(t_s, "skip frame: past end of narration");
            return FrameOutcome::Skipped(SkipReason::PastEnd);
        }

        let Some(spectrum) = self
            .analyzer
            .analyze(buffer, t_s, self.analysis.window_size)
        else {
            trace!(t_s, "skip frame: empty analysis window");
            return FrameOutcome::Skipped(SkipReason::EmptyWindow);
        };

        let bands = map_bands(&spectrum, self.analysis.bands_for(self.original.len()));
        if bands.is_empty() {
            trace!(t_s, spectrum_len = spectrum.len(), "skip frame: no bands");
            return FrameOutcome::Skipped(SkipReason::NoBands);
        }

        let deformation = self.deformer.deform(&self.original, &bands);
        shape.replace_vertices(deformation.vertices);
        shape.rotate(deformation.rotation_delta);

        FrameOutcome::Updated {
            rotation_delta: deformation.rotation_delta,
            bands,
        }
    }
}

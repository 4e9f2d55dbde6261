//! Headless narration scene: attach, play at a fixed frame rate, detach, hold.

use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::driver::{FrameDriver, FrameOutcome, NarrationContext};
use crate::audio::AudioBuffer;
use crate::error::VizResult;
use crate::params::{AnalysisConfig, DeformMapping, SceneTiming, ShapeConfig};
use crate::shape::Polygon;

/// Fixed-rate monotonic clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin_s: f64,
    fps: u32,
    frame: usize,
}

impl FrameClock {
    pub fn new(origin_s: f64, fps: u32) -> Self {
        Self {
            origin_s,
            fps,
            frame: 0,
        }
    }

    /// Current reading (seconds)
    pub fn now(&self) -> f64 {
        self.origin_s + self.frame as f64 / self.fps as f64
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn advance(&mut self) {
        self.frame += 1;
    }
}

/// Polygon state after one rendered frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub index: usize,
    /// Clock reading (seconds)
    pub time_s: f64,
    /// Whether the driver replaced the geometry this frame
    pub updated: bool,
    pub rotation_delta: f32,
    /// Accumulated orientation (radians)
    pub orientation: f32,
    /// Vertices with orientation applied
    pub vertices: Vec<[f32; 3]>,
}

/// Every frame of a baked narration scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTrack {
    pub fps: u32,
    pub sample_rate: u32,
    pub duration_s: f64,
    pub narration_start_s: f64,
    pub frames: Vec<FrameRecord>,
}

impl FrameTrack {
    /// Frames in which the driver changed the shape
    pub fn updated_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.updated).count()
    }

    pub fn to_json(&self, pretty: bool) -> VizResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn write_json<W: Write>(&self, mut writer: W, pretty: bool) -> VizResult<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)?;
        } else {
            serde_json::to_writer(&mut writer, self)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Audio-reactive square driven through one narration
#[derive(Debug, Clone, Default)]
pub struct NarrationScene {
    shape: ShapeConfig,
    analysis: AnalysisConfig,
    mapping: DeformMapping,
    timing: SceneTiming,
}

impl NarrationScene {
    pub fn new(
        shape: ShapeConfig,
        analysis: AnalysisConfig,
        mapping: DeformMapping,
        timing: SceneTiming,
    ) -> VizResult<Self> {
        shape.validate()?;
        analysis.validate()?;
        mapping.validate()?;
        timing.validate()?;
        Ok(Self {
            shape,
            analysis,
            mapping,
            timing,
        })
    }

    pub fn timing(&self) -> &SceneTiming {
        &self.timing
    }

    /// Play the narration frame by frame and record the polygon
    ///
    /// The driver is attached at the narration start, runs for
    /// `ceil(duration * fps)` frames, is detached, and the scene then holds
    /// the last geometry for `ceil(hold_after_s * fps)` frames.
    pub fn bake(&self, buffer: Arc<AudioBuffer>) -> VizResult<FrameTrack> {
        let mut polygon = Polygon::square(&self.shape);
        let mut driver = FrameDriver::new(
            polygon.rest_vertices().to_vec(),
            self.analysis.clone(),
            self.mapping.clone(),
        )?;

        let duration_s = buffer.duration_s();
        let sample_rate = buffer.sample_rate();
        let narration_frames = self.timing.frames_for(duration_s);
        let hold_frames = self.timing.frames_for(self.timing.hold_after_s);

        let mut clock = FrameClock::new(self.timing.narration_start_s, self.timing.fps);
        let mut frames = Vec::with_capacity(narration_frames + hold_frames);

        driver.attach(NarrationContext::new(buffer, self.timing.narration_start_s))?;
        for _ in 0..narration_frames {
            let outcome = driver.tick(clock.now(), &mut polygon);
            frames.push(record(&clock, &polygon, &outcome));
            clock.advance();
        }
        driver.detach()?;

        for _ in 0..hold_frames {
            let outcome = driver.tick(clock.now(), &mut polygon);
            frames.push(record(&clock, &polygon, &outcome));
            clock.advance();
        }

        let track = FrameTrack {
            fps: self.timing.fps,
            sample_rate,
            duration_s,
            narration_start_s: self.timing.narration_start_s,
            frames,
        };
        debug!(
            frames = track.frames.len(),
            updated = track.updated_frames(),
            narration_frames,
            hold_frames,
            frame_duration_s = self.timing.frame_duration_s(),
            "baked narration scene"
        );
        Ok(track)
    }
}

fn record(clock: &FrameClock, polygon: &Polygon, outcome: &FrameOutcome) -> FrameRecord {
    let rotation_delta = match outcome {
        FrameOutcome::Updated { rotation_delta, .. } => *rotation_delta,
        _ => 0.0,
    };
    FrameRecord {
        index: clock.frame(),
        time_s: clock.now(),
        updated: outcome.is_updated(),
        rotation_delta,
        orientation: polygon.orientation(),
        vertices: polygon
            .world_vertices()
            .into_iter()
            .map(|v| v.to_array())
            .collect(),
    }
}

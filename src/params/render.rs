//! Scene timing configuration.

use crate::error::{VizError, VizResult};

/// Timing of the headless narration scene
#[derive(Debug, Clone)]
pub struct SceneTiming {
    /// Frame rate (FPS)
    pub fps: u32,

    /// Clock reading when narration playback begins (seconds)
    pub narration_start_s: f64,

    /// Hold after narration ends, shape keeps its last geometry (seconds)
    pub hold_after_s: f64,
}

impl Default for SceneTiming {
    fn default() -> Self {
        Self {
            fps: 60,
            narration_start_s: 0.0,
            hold_after_s: 1.0,
        }
    }
}

impl SceneTiming {
    /// Duration of one frame (seconds)
    pub fn frame_duration_s(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Number of frames needed to cover `duration_s`
    pub fn frames_for(&self, duration_s: f64) -> usize {
        (duration_s * self.fps as f64).ceil().max(0.0) as usize
    }

    pub fn validate(&self) -> VizResult<()> {
        if self.fps == 0 {
            return Err(VizError::invalid_config("fps must be > 0"));
        }
        if !self.narration_start_s.is_finite() || self.narration_start_s < 0.0 {
            return Err(VizError::invalid_config(format!(
                "narration start must be a non-negative time, got {}",
                self.narration_start_s
            )));
        }
        if !self.hold_after_s.is_finite() || self.hold_after_s < 0.0 {
            return Err(VizError::invalid_config(format!(
                "hold must be a non-negative duration, got {}",
                self.hold_after_s
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_for_rounds_up() {
        let timing = SceneTiming::default();
        assert_eq!(timing.frames_for(1.0), 60);
        assert_eq!(timing.frames_for(1.01), 61);
        assert_eq!(timing.frames_for(0.0), 0);
    }

    #[test]
    fn test_validate_zero_fps() {
        let timing = SceneTiming {
            fps: 0,
            ..Default::default()
        };
        assert!(timing.validate().is_err());
    }
}

//! Reactive shape geometry and audio-to-shape mapping parameters.

use crate::error::{VizError, VizResult};

/// Rest geometry of the reactive polygon
#[derive(Debug, Clone)]
pub struct ShapeConfig {
    /// Points around the square perimeter (more points = smoother outline)
    /// Each side receives `num_points / 4` points.
    pub num_points: usize,

    /// Side length of the rest square (scene units)
    pub side_length: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            num_points: 150,
            side_length: 2.0,
        }
    }
}

impl ShapeConfig {
    pub fn validate(&self) -> VizResult<()> {
        if self.num_points < 4 {
            return Err(VizError::invalid_config(format!(
                "square perimeter needs at least 4 points, got {}",
                self.num_points
            )));
        }
        if !self.side_length.is_finite() || self.side_length <= 0.0 {
            return Err(VizError::invalid_config(format!(
                "side length must be > 0, got {}",
                self.side_length
            )));
        }
        Ok(())
    }
}

/// Mapping from normalized band intensities to shape changes
#[derive(Debug, Clone)]
pub struct DeformMapping {
    /// Scale factor: band intensity → radial scale
    /// Formula: scale = 1 + band * this_coefficient (1.0x to 1.5x at 0.5)
    pub scale_coefficient: f32,

    /// Scale factor: upper-half band mean → rotation delta (radians per frame)
    /// Formula: delta = mean(bands[len/2..]) * this_coefficient
    pub rotation_coefficient: f32,
}

impl Default for DeformMapping {
    fn default() -> Self {
        Self {
            scale_coefficient: 0.5,
            rotation_coefficient: 0.5,
        }
    }
}

impl DeformMapping {
    pub fn validate(&self) -> VizResult<()> {
        if !self.scale_coefficient.is_finite() || !self.rotation_coefficient.is_finite() {
            return Err(VizError::invalid_config(
                "deform coefficients must be finite",
            ));
        }
        Ok(())
    }
}

//! Radial deformation of rest geometry driven by band intensities.

use glam::Vec3;

use crate::audio::BandSet;
use crate::params::DeformMapping;

/// Output of one deformation step
#[derive(Debug, Clone, PartialEq)]
pub struct Deformation {
    pub vertices: Vec<Vec3>,
    /// Rotation to add on top of the shape's current orientation (radians)
    pub rotation_delta: f32,
}

/// Maps band intensities to vertex positions and a rotation increment
#[derive(Debug, Clone, Default)]
pub struct ShapeDeformer {
    mapping: DeformMapping,
}

impl ShapeDeformer {
    pub fn new(mapping: DeformMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &DeformMapping {
        &self.mapping
    }

    /// Scale every rest vertex radially by its band and compute the rotation delta
    ///
    /// Vertex `i` is driven by band `i % bands.len()`. Scale is
    /// `1 + band * scale_coefficient`; the delta is the upper-half band mean
    /// times `rotation_coefficient`.
    pub fn deform(&self, original: &[Vec3], bands: &BandSet) -> Deformation {
        let vertices = original
            .iter()
            .enumerate()
            .map(|(i, &point)| {
                let scale_factor = 1.0 + bands.for_vertex(i) * self.mapping.scale_coefficient;
                scale_radially(point, scale_factor)
            })
            .collect();

        Deformation {
            vertices,
            rotation_delta: bands.upper_half_mean() * self.mapping.rotation_coefficient,
        }
    }
}

/// Move `point` along its direction from the origin to `radius * scale_factor`
///
/// Only x and y contribute; z of the result is 0. A point at the origin uses
/// +x as its direction and stays at the origin.
pub fn scale_radially(point: Vec3, scale_factor: f32) -> Vec3 {
    let flat = Vec3::new(point.x, point.y, 0.0);
    let radius = flat.length();
    if radius > 0.0 {
        // direction * (radius * scale) == flat * scale
        flat * scale_factor
    } else {
        Vec3::X * (radius * scale_factor)
    }
}

//! Mutable polygon primitive and rest-geometry builders.

use glam::{Quat, Vec3};

use crate::params::ShapeConfig;

/// Capability the rendering side must provide for a reactive shape
pub trait ReactiveShape {
    /// Replace the full vertex list (not an incremental edit)
    fn replace_vertices(&mut self, vertices: Vec<Vec3>);

    /// Rotate by `delta` radians on top of the current orientation
    fn rotate(&mut self, delta: f32);

    fn vertex_count(&self) -> usize;
}

/// Closed polygon in the XY plane with an accumulated orientation
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec3>,
    /// Accumulated rotation about the origin (radians)
    orientation: f32,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            orientation: 0.0,
        }
    }

    /// Square outline described by `config`
    pub fn square(config: &ShapeConfig) -> Self {
        Self::new(square_perimeter(config.num_points, config.side_length))
    }

    /// Vertices as last assigned, before orientation is applied
    pub fn rest_vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    /// Vertices with the accumulated rotation applied
    pub fn world_vertices(&self) -> Vec<Vec3> {
        let rotation = Quat::from_rotation_z(self.orientation);
        self.vertices.iter().map(|&v| rotation * v).collect()
    }
}

impl ReactiveShape for Polygon {
    fn replace_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
    }

    fn rotate(&mut self, delta: f32) {
        self.orientation += delta;
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Points around the perimeter of a square centred on the origin
///
/// Generated clockwise from the top-left corner, `num_points / 4` per side:
/// top edge left to right, right edge top to bottom, bottom edge right to
/// left, left edge bottom to top. Remainder points are dropped.
pub fn square_perimeter(num_points: usize, side_length: f32) -> Vec<Vec3> {
    let per_side = num_points / 4;
    if per_side == 0 {
        return Vec::new();
    }
    let half = side_length / 2.0;
    let step = side_length / per_side as f32;

    let mut points = Vec::with_capacity(per_side * 4);

    // Top side (left to right)
    for i in 0..per_side {
        points.push(Vec3::new(-half + i as f32 * step, half, 0.0));
    }

    // Right side (top to bottom)
    for i in 0..per_side {
        points.push(Vec3::new(half, half - i as f32 * step, 0.0));
    }

    // Bottom side (right to left)
    for i in 0..per_side {
        points.push(Vec3::new(half - i as f32 * step, -half, 0.0));
    }

    // Left side (bottom to top)
    for i in 0..per_side {
        points.push(Vec3::new(-half, -half + i as f32 * step, 0.0));
    }

    points
}

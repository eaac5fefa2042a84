//! WGSL source and the uniform block it reads.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::field::Material;
use crate::gpu::Camera;

/// Point sprite shader: `vs_main` expands each instance into a camera-facing
/// quad, `fs_main` samples the sprite and applies fog.
pub const POINTS_SHADER: &str = include_str!("shaders/points.wgsl");

/// Uniform block for [`POINTS_SHADER`]. Layout matches the WGSL `Uniforms`
/// struct (224 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Linear fog color in rgb, density in w.
    pub fog: [f32; 4],
    pub point_size: f32,
    pub opacity: f32,
    pub _padding: [f32; 2],
}

impl PointUniforms {
    pub fn new(
        camera: &Camera,
        model: Mat4,
        material: &Material,
        fog_color: [f32; 3],
        fog_density: f32,
    ) -> Self {
        let [r, g, b] = fog_color;
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            fog: [r, g, b, fog_density],
            point_size: material.point_size,
            opacity: material.opacity,
            _padding: [0.0; 2],
        }
    }
}

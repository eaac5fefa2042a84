//! Fixed perspective camera looking at the origin down -Z.

use glam::{Mat4, Vec3};

/// Perspective camera placed on the +Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Camera {
    /// Create a camera for a viewport of `width x height` pixels.
    ///
    /// A zero-area viewport falls back to a square aspect.
    pub fn new(fov_deg: f32, distance: f32, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_deg,
            distance,
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Update the aspect ratio. Returns false and changes nothing when either
    /// dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }
}

// Perspective camera for the 3D stage

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::stage::follow::CameraPose;

/// Perspective camera looking at a point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera looks at
    pub look_at: Vec3,
    /// Vertical field of view in radians
    fov_y: f32,
    /// Viewport width / height
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Create a new camera looking at the origin
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            look_at: Vec3::ZERO,
            fov_y: fov_y_degrees.to_radians(),
            aspect: if aspect > 0.0 { aspect } else { 1.0 },
            near,
            far,
        }
    }

    /// Move the camera to a follow pose
    pub fn apply_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.look_at = pose.look_at;
    }

    /// Resize the viewport; zero-sized viewports are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// World -> view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    /// View -> clip transform (wgpu depth range 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Camera position, w unused
    pub eye: [f32; 4],
}

impl CameraUniform {
    /// Create a new camera uniform from a camera
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
        }
    }
}

// Orbit controls: rotate and zoom the camera around a pivot point

use glam::Vec3;

use crate::core::config::ControlsConfig;
use crate::core::math::{clamp, Spherical};
use crate::engine::renderer::Camera;
use crate::stage::render_loop::CameraControls;

/// Damped orbit around `target`, Y up
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    damping_factor: f32,
    min_distance: f32,
    max_distance: f32,
    max_polar_angle: f32,
    rotate_speed: f32,
    zoom_step: f32,
    /// Pending rotation, drained by `update`
    delta: Spherical,
    /// Pending distance multiplier
    scale: f32,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            damping_factor: config.damping_factor,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            max_polar_angle: config.max_polar_angle,
            rotate_speed: config.rotate_speed,
            zoom_step: config.zoom_step,
            delta: Spherical {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            },
            scale: 1.0,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Queue a rotation from a cursor drag in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.delta.theta -= dx * self.rotate_speed;
        self.delta.phi -= dy * self.rotate_speed;
    }

    /// Queue a zoom; positive notches move closer
    pub fn zoom(&mut self, notches: f32) {
        self.scale *= self.zoom_step.powf(notches);
    }

    /// Apply pending input and constraints to the camera
    pub fn update(&mut self, camera: &mut Camera) {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let step = if self.damping_factor > 0.0 {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.delta.theta * step;
        spherical.phi += self.delta.phi * step;
        spherical.phi = clamp(spherical.phi, 0.0, self.max_polar_angle);
        spherical = spherical.make_safe();

        spherical.radius = clamp(
            spherical.radius * self.scale,
            self.min_distance,
            self.max_distance,
        );

        camera.position = self.target + spherical.to_offset();
        camera.look_at = self.target;

        if self.damping_factor > 0.0 {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
        } else {
            self.delta.theta = 0.0;
            self.delta.phi = 0.0;
        }
        self.scale = 1.0;
    }
}

impl CameraControls for OrbitControls {
    fn set_pivot(&mut self, pivot: Vec3) {
        self.set_target(pivot);
    }

    fn update(&mut self, camera: &mut Camera) {
        OrbitControls::update(self, camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(position: Vec3) -> Camera {
        Camera::new(position, 45.0, 1.0, 0.1, 1000.0)
    }

    #[test]
    fn test_update_looks_at_target() {
        let mut controls = OrbitControls::new(&ControlsConfig::default());
        controls.set_target(Vec3::new(0.0, 1.5, 0.0));

        let mut camera = camera_at(Vec3::new(0.0, 1.0, 6.0));
        controls.update(&mut camera);

        assert_eq!(camera.look_at, Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_polar_angle_keeps_camera_above_target() {
        let mut controls = OrbitControls::new(&ControlsConfig::default());
        controls.set_target(Vec3::new(0.0, 1.5, 0.0));

        // Initial camera sits below the pivot
        let mut camera = camera_at(Vec3::new(0.0, -1.0, 5.0));
        controls.update(&mut camera);

        assert!(camera.position.y >= 1.5 - 1e-4);
        let distance = (camera.position - controls.target()).length();
        assert_relative_eq!(distance, (2.5f32 * 2.5 + 25.0).sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut controls = OrbitControls::new(&ControlsConfig::default());

        let mut near = camera_at(Vec3::new(0.0, 0.0, 1.0));
        controls.update(&mut near);
        assert_relative_eq!(near.position.length(), 4.0, epsilon = 1e-4);

        let mut far = camera_at(Vec3::new(0.0, 0.0, 50.0));
        controls.update(&mut far);
        assert_relative_eq!(far.position.length(), 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotation_is_damped() {
        let config = ControlsConfig::default();
        let mut controls = OrbitControls::new(&config);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0));

        controls.rotate(-100.0, 0.0);
        let queued = 100.0 * config.rotate_speed;

        controls.update(&mut camera);
        let first = Spherical::from_offset(camera.position).theta;
        assert_relative_eq!(first, queued * config.damping_factor, epsilon = 1e-5);

        controls.update(&mut camera);
        let second = Spherical::from_offset(camera.position).theta;
        let expected = queued * config.damping_factor * (2.0 - config.damping_factor);
        assert_relative_eq!(second, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_on_pivot_offset_is_left_in_place() {
        let mut controls = OrbitControls::new(&ControlsConfig::default());
        let pivot = Vec3::new(0.0, 0.02, -15.0);
        let position = pivot + Vec3::new(0.0, 1.0, 5.0);
        let mut camera = camera_at(position);

        CameraControls::set_pivot(&mut controls, pivot);
        CameraControls::update(&mut controls, &mut camera);

        assert!(camera.position.abs_diff_eq(position, 1e-4));
        assert_eq!(camera.look_at, pivot);
    }

    #[test]
    fn test_zoom_applies_once() {
        let config = ControlsConfig::default();
        let mut controls = OrbitControls::new(&config);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0));

        controls.zoom(1.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 10.0 * config.zoom_step, epsilon = 1e-4);

        controls.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 10.0 * config.zoom_step, epsilon = 1e-4);
    }
}

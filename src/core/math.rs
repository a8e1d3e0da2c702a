// Math utilities shared by the camera, controls and animation sampling

use glam::Vec3;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Spherical coordinates around a pivot, Y up
///
/// `theta` is the azimuth around +Y measured from +Z, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    /// Convert a cartesian offset into spherical coordinates
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }

        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: clamp(offset.y / radius, -1.0, 1.0).acos(),
        }
    }

    /// Convert back into a cartesian offset
    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep `phi` away from the poles so `look_at` stays well defined
    pub fn make_safe(mut self) -> Self {
        const EPS: f32 = 1e-6;
        self.phi = clamp(self.phi, EPS, std::f32::consts::PI - EPS);
        self
    }
}

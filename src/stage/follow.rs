// Camera follow: keeps the camera behind the walking character

use glam::Vec3;

/// Default offset from the character to the camera
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 5.0);

/// Camera placement produced by a follow step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Places the camera at a fixed offset from a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFollow {
    offset: Vec3,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self::new(FOLLOW_OFFSET)
    }
}

impl CameraFollow {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Camera at `target + offset`, looking at `target`
    pub fn follow(&self, target: Vec3) -> CameraPose {
        CameraPose {
            position: target + self.offset,
            look_at: target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_default_offset() {
        let pose = CameraFollow::default().follow(Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(pose.position, Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(pose.look_at, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_follow_is_pure() {
        let follow = CameraFollow::default();
        let p = Vec3::new(0.5, 0.02, 4.0);

        let first = follow.follow(p);
        follow.follow(Vec3::new(100.0, -3.0, 7.0));
        let again = follow.follow(p);

        assert_eq!(first, again);
        assert_eq!(first.position, p + Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(first.look_at, p);
    }

    #[test]
    fn test_follow_custom_offset() {
        let follow = CameraFollow::new(Vec3::new(0.0, 2.0, 8.0));
        let pose = follow.follow(Vec3::ZERO);
        assert_eq!(pose.position, Vec3::new(0.0, 2.0, 8.0));
        assert_eq!(follow.offset(), Vec3::new(0.0, 2.0, 8.0));
    }
}

// Model data handed over by the loader: animation clips and bounds

use glam::Vec3;

/// Keyframed translation of the model root (root motion)
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTrack {
    times: Vec<f32>,
    values: Vec<Vec3>,
}

impl TranslationTrack {
    /// Create a track; `None` if it has no keys or the key counts disagree
    pub fn new(times: Vec<f32>, values: Vec<Vec3>) -> Option<Self> {
        if times.is_empty() || times.len() != values.len() {
            return None;
        }
        Some(Self { times, values })
    }

    /// Sample the track with linear interpolation, clamped at both ends
    pub fn sample(&self, time: f32) -> Vec3 {
        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return self.values[0];
        }
        if time >= self.times[last] {
            return self.values[last];
        }

        // First key strictly after `time`; the guards above keep it in 1..=last
        let next = self.times.partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        if span <= f32::EPSILON {
            return self.values[next];
        }

        let t = (time - self.times[prev]) / span;
        self.values[prev].lerp(self.values[next], t)
    }

    pub fn key_count(&self) -> usize {
        self.times.len()
    }
}

/// A named skeletal animation clip of the loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Lowercase clip name
    pub name: String,
    /// Length of one cycle in seconds
    pub duration: f32,
    /// Translation of the model root over the clip, if the clip moves it
    pub root_motion: Option<TranslationTrack>,
}

impl AnimationClip {
    /// Create a clip; the name is lowercased
    pub fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_lowercase(),
            duration: duration.max(0.0),
            root_motion: None,
        }
    }

    /// Attach a root motion track
    pub fn with_root_motion(mut self, track: Option<TranslationTrack>) -> Self {
        self.root_motion = track;
        self
    }
}

/// Axis-aligned bounds in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Everything the stage needs from a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    /// Clips in file order
    pub clips: Vec<AnimationClip>,
    /// Mesh bounds, if the model has meshes
    pub bounds: Option<Bounds>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clip_name_lowercased() {
        let clip = AnimationClip::new("Walk", 1.2);
        assert_eq!(clip.name, "walk");
        assert_eq!(clip.duration, 1.2);
        assert!(clip.root_motion.is_none());
    }

    #[test]
    fn test_negative_duration_clamped() {
        assert_eq!(AnimationClip::new("idle", -1.0).duration, 0.0);
    }

    #[test]
    fn test_track_rejects_mismatched_keys() {
        assert!(TranslationTrack::new(vec![0.0, 1.0], vec![Vec3::ZERO]).is_none());
        assert!(TranslationTrack::new(Vec::new(), Vec::new()).is_none());
    }

    #[test]
    fn test_track_sampling() {
        let track = TranslationTrack::new(
            vec![0.0, 1.0, 2.0],
            vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 3.0)],
        )
        .unwrap();

        assert_eq!(track.sample(-1.0), Vec3::ZERO);
        assert_relative_eq!(track.sample(0.5).z, 0.5);
        assert_relative_eq!(track.sample(1.5).z, 2.0);
        assert_eq!(track.sample(5.0), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(track.key_count(), 3);
    }

    #[test]
    fn test_single_key_track_is_constant() {
        let track = TranslationTrack::new(vec![0.5], vec![Vec3::X]).unwrap();
        assert_eq!(track.sample(0.0), Vec3::X);
        assert_eq!(track.sample(3.0), Vec3::X);
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds {
            min: Vec3::new(-1.0, 0.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        let b = Bounds {
            min: Vec3::new(-0.5, -0.5, -2.0),
            max: Vec3::new(0.5, 2.0, 0.5),
        };
        let u = a.union(b);
        assert_eq!(u.min, Vec3::new(-1.0, -0.5, -2.0));
        assert_eq!(u.max, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(u.half_extents(), Vec3::new(1.0, 1.25, 1.5));
    }
}

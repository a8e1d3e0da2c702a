// Animation mixer and the character it poses

use crate::engine::assets::AnimationClip;
use glam::Vec3;
use log::debug;

/// Resting animation, also the fallback when a clip is missing
pub const IDLE: &str = "idle";
/// The only animation during which the camera follows the character
pub const WALK: &str = "walk";

/// Clip names the page sections are expected to use
pub const KNOWN_ANIMATIONS: [&str; 7] = [
    IDLE, "hello", "break", "pose", WALK, "thanks", "phone",
];

/// Index of a clip's action inside the mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipHandle(usize);

/// Playback state of one clip
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: AnimationClip,
    time: f32,
    playing: bool,
}

impl AnimationAction {
    fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            playing: false,
        }
    }

    /// Rewind to the start of the clip
    fn reset(&mut self) {
        self.time = 0.0;
    }

    /// Advance local time, looping over the clip duration
    fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt;
        if self.time >= duration {
            self.time %= duration;
        }
    }

    /// Local playback time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Counters describing what the mixer has been asked to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixerStats {
    /// Number of clip starts
    pub starts: u64,
    /// Number of stop-all calls
    pub stop_alls: u64,
}

/// Plays clips against the character and evaluates root motion
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    stats: MixerStats,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a clip to this mixer
    pub fn add_clip(&mut self, clip: AnimationClip) -> ClipHandle {
        self.actions.push(AnimationAction::new(clip));
        ClipHandle(self.actions.len() - 1)
    }

    /// Reset a clip to time zero and start it
    pub fn play(&mut self, handle: ClipHandle) {
        if let Some(action) = self.actions.get_mut(handle.0) {
            action.reset();
            action.playing = true;
            self.stats.starts += 1;
        }
    }

    /// Stop every clip
    pub fn stop_all(&mut self) {
        for action in &mut self.actions {
            action.playing = false;
        }
        self.stats.stop_alls += 1;
    }

    /// Advance all playing clips and pose the target from their root motion
    pub fn update(&mut self, dt: f32, target: Option<&mut Target>) {
        for action in &mut self.actions {
            action.update(dt);
        }

        let Some(target) = target else {
            return;
        };

        let root_offset = self
            .actions
            .iter()
            .filter(|action| action.playing)
            .find_map(|action| {
                action
                    .clip
                    .root_motion
                    .as_ref()
                    .map(|track| track.sample(action.time))
            })
            .unwrap_or(Vec3::ZERO);

        target.apply_root_offset(root_offset);
    }

    pub fn action(&self, handle: ClipHandle) -> Option<&AnimationAction> {
        self.actions.get(handle.0)
    }

    /// Number of clips currently playing
    pub fn playing_count(&self) -> usize {
        self.actions.iter().filter(|action| action.playing).count()
    }

    pub fn stats(&self) -> MixerStats {
        self.stats
    }
}

/// The loaded character as far as the stage is concerned: where it stands
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    base_position: Vec3,
    scale: f32,
    position: Vec3,
    half_extents: Vec3,
}

impl Target {
    /// Place the character at `base_position`, scaled uniformly
    pub fn new(base_position: Vec3, scale: f32, half_extents: Vec3) -> Self {
        debug!("Character placed at {:?} (scale {})", base_position, scale);
        Self {
            base_position,
            scale,
            position: base_position,
            half_extents,
        }
    }

    /// Move the character by a root motion offset in model space
    pub fn apply_root_offset(&mut self, offset: Vec3) {
        self.position = self.base_position + offset * self.scale;
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Half size of the character's bounding box in world units
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents * self.scale
    }
}

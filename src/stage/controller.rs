// Animation controller: the single place where clips are started and stopped

use super::animation::{AnimationMixer, IDLE, WALK};
use super::registry::AnimationRegistry;
use crate::core::FallbackPolicy;
use log::{debug, info};

/// What a call to `request_animation` ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The requested clip started
    Started,
    /// The clip was missing and "idle" started instead
    FellBack,
    /// The clip is already the current one
    AlreadyPlaying,
    /// Nothing to play (model not loaded or clip missing)
    Unavailable,
}

/// Current-animation state machine
///
/// At most one clip plays at a time; asking for the current clip again is a no-op.
#[derive(Debug)]
pub struct AnimationController {
    current: Option<String>,
    is_walking: bool,
    fallback: FallbackPolicy,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(FallbackPolicy::default())
    }
}

impl AnimationController {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self {
            current: None,
            is_walking: false,
            fallback,
        }
    }

    /// Name of the clip currently playing
    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// True iff the current clip is "walk"
    pub fn is_walking(&self) -> bool {
        self.is_walking
    }

    /// Switch to `name`, stopping whatever else plays
    ///
    /// Never fails: before the model has loaded, or for unknown clips, the state is kept.
    /// A missing non-idle clip falls back to "idle" once when the policy allows it.
    pub fn request_animation(
        &mut self,
        name: &str,
        registry: &AnimationRegistry,
        mixer: Option<&mut AnimationMixer>,
    ) -> RequestOutcome {
        let Some(mixer) = mixer else {
            debug!("Animation '{}' requested before the model loaded", name);
            return RequestOutcome::Unavailable;
        };

        match self.transition(name, registry, mixer) {
            RequestOutcome::Unavailable if self.fallback == FallbackPolicy::Idle && name != IDLE => {
                debug!("Animation '{}' not found, falling back to '{}'", name, IDLE);
                match self.transition(IDLE, registry, mixer) {
                    RequestOutcome::Started => RequestOutcome::FellBack,
                    outcome => outcome,
                }
            }
            outcome => outcome,
        }
    }

    fn transition(
        &mut self,
        name: &str,
        registry: &AnimationRegistry,
        mixer: &mut AnimationMixer,
    ) -> RequestOutcome {
        let Some(handle) = registry.get(name) else {
            debug!("Animation '{}' is not initialized or found", name);
            return RequestOutcome::Unavailable;
        };

        if self.current.as_deref() == Some(name) {
            return RequestOutcome::AlreadyPlaying;
        }

        mixer.stop_all();
        mixer.play(handle);
        self.current = Some(name.to_string());
        self.is_walking = name == WALK;
        info!("Playing animation: {}", name);

        RequestOutcome::Started
    }
}

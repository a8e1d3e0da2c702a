// The stage: one character, its clips and the camera looking at it
//
// - `animation`: mixer, clip playback and the posed target
// - `registry`: clip name lookup
// - `controller`: which clip plays
// - `dispatcher`: page sections -> clip requests
// - `follow`: camera placement behind the character
// - `render_loop`: per-frame ordering

pub mod animation;
pub mod controller;
pub mod dispatcher;
pub mod follow;
pub mod registry;
pub mod render_loop;

use glam::Vec3;
use log::{info, warn};

use crate::core::config::ModelConfig;
use crate::core::FallbackPolicy;
use crate::engine::assets::LoadedModel;
use crate::engine::renderer::Camera;
use animation::{AnimationMixer, Target};
use controller::{AnimationController, RequestOutcome};
use dispatcher::AnimationSink;
use registry::AnimationRegistry;

/// Half size used for the character stand-in when the model has no meshes
const DEFAULT_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.9, 0.3);

/// Owns everything the render loop and the dispatcher share
///
/// The mixer and target stay `None` until the model has loaded.
pub struct Stage {
    camera: Camera,
    registry: AnimationRegistry,
    controller: AnimationController,
    mixer: Option<AnimationMixer>,
    target: Option<Target>,
}

impl Stage {
    pub fn new(camera: Camera, fallback: FallbackPolicy) -> Self {
        Self {
            camera,
            registry: AnimationRegistry::new(),
            controller: AnimationController::new(fallback),
            mixer: None,
            target: None,
        }
    }

    /// Place the loaded character, register its clips and start `initial`
    ///
    /// Only the first model is installed; later calls are ignored.
    pub fn install_model(
        &mut self,
        model: LoadedModel,
        config: &ModelConfig,
        initial: &str,
    ) -> RequestOutcome {
        if self.mixer.is_some() {
            warn!("Model already installed, ignoring");
            return RequestOutcome::Unavailable;
        }

        let half_extents = model
            .bounds
            .map(|bounds| bounds.half_extents())
            .unwrap_or(DEFAULT_HALF_EXTENTS);
        self.target = Some(Target::new(
            Vec3::from_array(config.position),
            config.scale,
            half_extents,
        ));

        let mut mixer = AnimationMixer::new();
        let entries: Vec<_> = model
            .clips
            .into_iter()
            .map(|clip| {
                let name = clip.name.clone();
                (name, mixer.add_clip(clip))
            })
            .collect();
        self.registry.populate(entries);
        self.mixer = Some(mixer);

        info!(
            "Model installed with {} animation(s): {:?}",
            self.registry.len(),
            self.registry.names()
        );

        self.request_animation(initial)
    }

    pub fn request_animation(&mut self, name: &str) -> RequestOutcome {
        self.controller
            .request_animation(name, &self.registry, self.mixer.as_mut())
    }

    /// Advance playback; returns false while there is no mixer yet
    pub fn advance_animation(&mut self, dt: f32) -> bool {
        match self.mixer.as_mut() {
            Some(mixer) => {
                mixer.update(dt, self.target.as_mut());
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.mixer.is_some()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn registry(&self) -> &AnimationRegistry {
        &self.registry
    }
}

impl AnimationSink for Stage {
    fn request_animation(&mut self, name: &str) {
        Stage::request_animation(self, name);
    }
}

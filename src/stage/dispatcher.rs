// Visibility dispatcher: page sections -> animation requests

use crate::engine::scroll::VisibilityEvent;
use log::debug;
use std::collections::HashMap;

/// Anything that accepts animation requests
pub trait AnimationSink {
    fn request_animation(&mut self, name: &str);
}

/// Static section id -> animation name table
#[derive(Debug, Clone, Default)]
pub struct SectionAnimationMap {
    entries: HashMap<String, String>,
}

impl SectionAnimationMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Animation for a section; unmapped sections have none
    pub fn animation_for(&self, section_id: &str) -> Option<&str> {
        self.entries.get(section_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, A: Into<String>> FromIterator<(S, A)> for SectionAnimationMap {
    fn from_iter<I: IntoIterator<Item = (S, A)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(section, animation)| (section.into(), animation.into()))
                .collect(),
        )
    }
}

/// Forwards "section became visible" events to the animation controller
#[derive(Debug, Clone)]
pub struct VisibilityDispatcher {
    map: SectionAnimationMap,
}

impl VisibilityDispatcher {
    pub fn new(map: SectionAnimationMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &SectionAnimationMap {
        &self.map
    }

    /// Handle one event; returns the animation requested, if any
    pub fn dispatch<'a>(
        &'a self,
        event: &VisibilityEvent,
        sink: &mut dyn AnimationSink,
    ) -> Option<&'a str> {
        if !event.is_intersecting {
            return None;
        }

        debug!("Section {} is visible", event.section_id);
        match self.map.animation_for(&event.section_id) {
            Some(animation) => {
                sink.request_animation(animation);
                Some(animation)
            }
            None => {
                debug!("No animation found for section: {}", event.section_id);
                None
            }
        }
    }

    /// Handle a batch of events in delivery order
    pub fn dispatch_all(&self, events: &[VisibilityEvent], sink: &mut dyn AnimationSink) {
        for event in events {
            self.dispatch(event, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ModelConfig;
    use crate::core::FallbackPolicy;
    use crate::engine::assets::{AnimationClip, LoadedModel};
    use crate::engine::renderer::Camera;
    use crate::stage::Stage;
    use glam::Vec3;

    #[derive(Default)]
    struct RecordingSink {
        requests: Vec<String>,
    }

    impl AnimationSink for RecordingSink {
        fn request_animation(&mut self, name: &str) {
            self.requests.push(name.to_string());
        }
    }

    fn dispatcher() -> VisibilityDispatcher {
        VisibilityDispatcher::new(
            [("hero", "idle"), ("store", "walk"), ("contactForm", "phone")]
                .into_iter()
                .collect(),
        )
    }

    fn event(id: &str, is_intersecting: bool) -> VisibilityEvent {
        VisibilityEvent {
            section_id: id.to_string(),
            is_intersecting,
            ratio: if is_intersecting { 0.5 } else { 0.0 },
        }
    }

    #[test]
    fn test_mapped_section_requests_animation() {
        let mut sink = RecordingSink::default();
        let dispatcher = dispatcher();
        let requested = dispatcher.dispatch(&event("store", true), &mut sink);
        assert_eq!(requested, Some("walk"));
        assert_eq!(sink.requests, vec!["walk"]);
    }

    #[test]
    fn test_unmapped_section_does_nothing() {
        let mut sink = RecordingSink::default();
        let dispatcher = dispatcher();
        let requested = dispatcher.dispatch(&event("footer", true), &mut sink);
        assert_eq!(requested, None);
        assert!(sink.requests.is_empty());
    }

    #[test]
    fn test_section_leaving_view_does_nothing() {
        let mut sink = RecordingSink::default();
        dispatcher().dispatch(&event("store", false), &mut sink);
        assert!(sink.requests.is_empty());
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut sink = RecordingSink::default();
        let events = [
            event("hero", false),
            event("store", true),
            event("footer", true),
            event("contactForm", true),
        ];
        dispatcher().dispatch_all(&events, &mut sink);
        assert_eq!(sink.requests, vec!["walk", "phone"]);
    }

    #[test]
    fn test_map_lookup() {
        let map: SectionAnimationMap = [("hello", "hello")].into_iter().collect();
        assert_eq!(map.animation_for("hello"), Some("hello"));
        assert_eq!(map.animation_for("missing"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_missing_clip_on_stage_falls_back_to_idle() {
        let camera = Camera::new(Vec3::new(0.0, -1.0, 5.0), 45.0, 1.0, 0.1, 1000.0);
        let mut stage = Stage::new(camera, FallbackPolicy::Idle);
        let model = LoadedModel {
            clips: vec![AnimationClip::new("idle", 1.0), AnimationClip::new("hello", 1.0)],
            bounds: None,
        };
        stage.install_model(model, &ModelConfig::default(), "hello");
        assert_eq!(stage.controller().current_animation(), Some("hello"));

        let dispatcher = dispatcher();
        let requested = dispatcher.dispatch(&event("store", true), &mut stage);

        assert_eq!(requested, Some("walk"));
        assert_eq!(stage.controller().current_animation(), Some("idle"));
        assert!(!stage.controller().is_walking());
    }
}

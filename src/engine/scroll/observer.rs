// Section visibility observer, modelled on the browser's intersection observer

use super::layout::{PageLayout, Section};
use crate::core::config::ObserverConfig;
use log::debug;

/// A section crossed the visibility threshold
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    pub section_id: String,
    pub is_intersecting: bool,
    /// Visible fraction of the section when the event fired
    pub ratio: f32,
}

/// Fraction of `section` inside the page range `[root_top, root_bottom]`
pub fn intersection_ratio(section: &Section, root_top: f32, root_bottom: f32) -> f32 {
    if section.height <= 0.0 {
        return 0.0;
    }
    let overlap = section.bottom().min(root_bottom) - section.top.max(root_top);
    (overlap.max(0.0) / section.height).min(1.0)
}

/// Tracks which sections are visible and reports changes
///
/// The viewport's bottom edge is pulled inward by `root_margin_bottom`; a section
/// counts as visible once at least `threshold` of it lies inside that area.
#[derive(Debug)]
pub struct VisibilityObserver {
    root_margin_bottom: f32,
    threshold: f32,
    /// Last reported state per section, `None` until first reported
    states: Vec<Option<bool>>,
    observing: bool,
}

impl VisibilityObserver {
    pub fn new(config: &ObserverConfig) -> Self {
        Self {
            root_margin_bottom: config.root_margin_bottom,
            threshold: config.threshold,
            states: Vec::new(),
            observing: false,
        }
    }

    /// Start observing; the next poll reports every section once
    pub fn observe(&mut self, layout: &PageLayout) {
        if self.observing {
            return;
        }
        self.states = vec![None; layout.sections().len()];
        self.observing = true;
        debug!("Observing {} sections", layout.sections().len());
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Visible page range after applying the root margin
    pub fn root_bounds(&self, layout: &PageLayout) -> (f32, f32) {
        let (top, bottom) = layout.viewport();
        (top, (bottom - self.root_margin_bottom).max(top))
    }

    fn is_visible(&self, section: &Section, root: (f32, f32)) -> (bool, f32) {
        let ratio = intersection_ratio(section, root.0, root.1);
        let visible = if self.threshold > 0.0 {
            ratio >= self.threshold
        } else {
            ratio > 0.0
        };
        (visible, ratio)
    }

    /// Compare the current layout with the last reported state
    ///
    /// Events come out in document order, one per section whose state changed.
    pub fn poll(&mut self, layout: &PageLayout) -> Vec<VisibilityEvent> {
        if !self.observing {
            return Vec::new();
        }

        let root = self.root_bounds(layout);
        let mut events = Vec::new();

        for (index, section) in layout.sections().iter().enumerate() {
            let (visible, ratio) = self.is_visible(section, root);
            let Some(state) = self.states.get_mut(index) else {
                continue;
            };

            if *state != Some(visible) {
                *state = Some(visible);
                debug!(
                    "Section {} intersecting: {}",
                    section.id, visible
                );
                events.push(VisibilityEvent {
                    section_id: section.id.clone(),
                    is_intersecting: visible,
                    ratio,
                });
            }
        }

        events
    }
}

// Virtual page: a vertical column of sections scrolled by the visitor

use crate::core::config::PageConfig;
use crate::core::math::clamp;

/// One page section in page coordinates (pixels, y grows downward)
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f32,
    pub height: f32,
}

impl Section {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// The scrollable page and the viewport looking at it
#[derive(Debug, Clone)]
pub struct PageLayout {
    sections: Vec<Section>,
    scroll: f32,
    viewport_height: f32,
    line_height: f32,
    page_step_ratio: f32,
}

impl PageLayout {
    /// Stack the configured sections top to bottom
    pub fn new(config: &PageConfig, viewport_height: f32) -> Self {
        let mut top = 0.0;
        let sections = config
            .sections
            .iter()
            .map(|section| {
                let placed = Section {
                    id: section.id.clone(),
                    top,
                    height: section.height,
                };
                top += section.height;
                placed
            })
            .collect();

        Self {
            sections,
            scroll: 0.0,
            viewport_height: viewport_height.max(0.0),
            line_height: config.line_height,
            page_step_ratio: config.page_step_ratio,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn total_height(&self) -> f32 {
        self.sections.last().map(Section::bottom).unwrap_or(0.0)
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Visible page range as (top, bottom)
    pub fn viewport(&self) -> (f32, f32) {
        (self.scroll, self.scroll + self.viewport_height)
    }

    /// Scroll by a pixel delta (positive = down), clamped to the page
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll + delta);
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll = clamp(offset, 0.0, self.max_scroll());
    }

    /// Scroll by wheel lines (positive = down)
    pub fn scroll_lines(&mut self, lines: f32) {
        self.scroll_by(lines * self.line_height);
    }

    /// Scroll by whole viewport pages (positive = down)
    pub fn scroll_pages(&mut self, pages: f32) {
        self.scroll_by(pages * self.viewport_height * self.page_step_ratio);
    }

    /// Window resized; keep the scroll offset within the new bounds
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.scroll_to(self.scroll);
    }

    /// The section under the viewport's top edge
    pub fn section_at_top(&self) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| self.scroll >= section.top && self.scroll < section.bottom())
    }
}

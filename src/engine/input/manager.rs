// Input manager - turns raw winit events into viewer commands

use std::collections::HashMap;

use super::action::{default_bindings, Action, InputSource};
use crate::engine::scroll::PageLayout;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Pixels of trackpad scroll treated as one zoom notch
const PIXELS_PER_ZOOM_NOTCH: f32 = 50.0;

/// A decoded input, ready to apply to the page or camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    Action(Action),
    /// Wheel lines, positive = down the page
    ScrollLines(f32),
    /// Trackpad pixels, positive = down the page
    ScrollPixels(f32),
    /// Zoom notches, positive = closer
    Zoom(f32),
    /// Cursor movement while dragging, in pixels
    Rotate { dx: f32, dy: f32 },
}

impl InputCommand {
    /// Apply a page navigation command; returns whether the scroll offset moved
    pub fn apply_scroll(&self, layout: &mut PageLayout) -> bool {
        let before = layout.scroll();
        match *self {
            InputCommand::ScrollLines(lines) => layout.scroll_lines(lines),
            InputCommand::ScrollPixels(pixels) => layout.scroll_by(pixels),
            InputCommand::Action(Action::ScrollLineUp) => layout.scroll_lines(-1.0),
            InputCommand::Action(Action::ScrollLineDown) => layout.scroll_lines(1.0),
            InputCommand::Action(Action::PageUp) => layout.scroll_pages(-1.0),
            InputCommand::Action(Action::PageDown) => layout.scroll_pages(1.0),
            InputCommand::Action(Action::Home) => layout.scroll_to(0.0),
            InputCommand::Action(Action::End) => layout.scroll_to(layout.max_scroll()),
            _ => return false,
        }
        layout.scroll() != before
    }
}

/// Keyboard and mouse state for the viewer window
pub struct InputManager {
    bindings: HashMap<InputSource, Action>,
    modifiers: ModifiersState,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            bindings: default_bindings().into_iter().collect(),
            modifiers: ModifiersState::empty(),
            dragging: false,
            last_cursor: None,
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> Option<InputCommand> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.process_key(code, event.state, event.repeat)
    }

    pub fn process_key(
        &mut self,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
    ) -> Option<InputCommand> {
        if state != ElementState::Pressed {
            return None;
        }
        let action = *self.bindings.get(&InputSource::key(code))?;
        if repeat && !action.repeats() {
            return None;
        }
        Some(InputCommand::Action(action))
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Track the orbit drag button
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if self.bindings.get(&InputSource::mouse(button)) != Some(&Action::Orbit) {
            return;
        }
        self.dragging = state == ElementState::Pressed;
    }

    /// Cursor moved; yields a rotation while the orbit button is held
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) -> Option<InputCommand> {
        let previous = self.last_cursor.replace((x, y));
        if !self.dragging {
            return None;
        }
        let (px, py) = previous?;
        Some(InputCommand::Rotate {
            dx: (x - px) as f32,
            dy: (y - py) as f32,
        })
    }

    /// Wheel scrolls the page; with Ctrl held it zooms the camera instead
    pub fn process_wheel(&self, delta: MouseScrollDelta) -> InputCommand {
        let zoom = self.modifiers.control_key();
        match delta {
            MouseScrollDelta::LineDelta(_, y) if zoom => InputCommand::Zoom(y),
            MouseScrollDelta::LineDelta(_, y) => InputCommand::ScrollLines(-y),
            MouseScrollDelta::PixelDelta(pos) if zoom => {
                InputCommand::Zoom(pos.y as f32 / PIXELS_PER_ZOOM_NOTCH)
            }
            MouseScrollDelta::PixelDelta(pos) => InputCommand::ScrollPixels(-pos.y as f32),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

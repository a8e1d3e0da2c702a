// Viewer action definitions and mappings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Everything a key or button can ask the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Page navigation
    ScrollLineUp,
    ScrollLineDown,
    PageUp,
    PageDown,
    Home,
    End,

    // Camera
    Orbit,

    // Meta
    ToggleStats,
}

impl Action {
    /// Held-key repeats keep scrolling; toggles fire once per press
    pub fn repeats(self) -> bool {
        !matches!(self, Action::ToggleStats | Action::Orbit)
    }
}

/// Represents an input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Browser-like page navigation keys
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowUp), Action::ScrollLineUp),
        (InputSource::key(KeyCode::ArrowDown), Action::ScrollLineDown),
        (InputSource::key(KeyCode::PageUp), Action::PageUp),
        (InputSource::key(KeyCode::PageDown), Action::PageDown),
        (InputSource::key(KeyCode::Space), Action::PageDown),
        (InputSource::key(KeyCode::Home), Action::Home),
        (InputSource::key(KeyCode::End), Action::End),
        (InputSource::mouse(MouseButton::Left), Action::Orbit),
        (InputSource::key(KeyCode::F3), Action::ToggleStats),
    ]
}

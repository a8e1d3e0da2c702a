// Input handling for the viewer window
//
// - `action`: viewer actions and their default key/button bindings
// - `manager`: decodes winit events into `InputCommand`s

pub mod action;
pub mod manager;

pub use action::Action;
pub use manager::{InputCommand, InputManager};

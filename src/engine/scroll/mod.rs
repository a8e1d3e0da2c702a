// Scroll tracking for the virtual landing page
//
// - `layout`: section column and scroll offset
// - `observer`: turns scroll positions into section visibility events

mod layout;
mod observer;

pub use layout::{PageLayout, Section};
pub use observer::{intersection_ratio, VisibilityEvent, VisibilityObserver};

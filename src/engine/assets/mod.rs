// Model asset loading
//
// Loads the character model off the event-loop thread and hands over its
// animation clips and bounds once parsing completes.

mod clip;
mod loader;

pub use clip::{AnimationClip, Bounds, LoadedModel, TranslationTrack};
pub use loader::{parse_model, ModelLoader};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("Invalid glTF model: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

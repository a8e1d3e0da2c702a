// glTF model loading

use super::clip::{AnimationClip, Bounds, LoadedModel, TranslationTrack};
use super::AssetError;
use anyhow::Result;
use glam::Vec3;
use gltf::animation::util::ReadOutputs;
use gltf::animation::Property;
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// Asset loader responsible for finding and parsing the character model
#[derive(Debug, Clone)]
pub struct ModelLoader {
    base_path: PathBuf,
}

impl ModelLoader {
    /// Create a new loader resolving relative paths against `base_path`
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for a model
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Load model bytes from disk
    pub fn load_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let path = self.resolve_path(path);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        std::fs::read(&path).map_err(|e| {
            AssetError::LoadError(format!("Failed to read {}: {}", path.display(), e)).into()
        })
    }

    /// Load and parse a model synchronously
    pub fn load(&self, path: &Path) -> Result<LoadedModel> {
        let bytes = self.load_bytes(path)?;
        let resolved = self.resolve_path(path);
        let model = parse_model(&bytes, resolved.parent())?;
        info!(
            "Model loaded from {} ({} clips)",
            resolved.display(),
            model.clips.len()
        );
        Ok(model)
    }

    /// Load a model on a background thread
    ///
    /// `on_complete` runs exactly once on the loader thread with the result.
    pub fn spawn<F>(&self, path: PathBuf, on_complete: F) -> std::io::Result<JoinHandle<()>>
    where
        F: FnOnce(Result<LoadedModel>) + Send + 'static,
    {
        let loader = self.clone();
        thread::Builder::new()
            .name("model-loader".to_string())
            .spawn(move || {
                debug!("Loading model {}", path.display());
                on_complete(loader.load(&path));
            })
    }
}

/// Parse a glTF/GLB document into clips and bounds
///
/// Only the animation and bounds data are read; meshes, skins and images are left
/// to the renderer. `base` resolves external buffer URIs of `.gltf` files.
pub fn parse_model(bytes: &[u8], base: Option<&Path>) -> Result<LoadedModel> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(AssetError::from)?;
    let buffers = gltf::import_buffers(&document, base, blob).map_err(AssetError::from)?;

    // Root motion lives on the nodes directly under the scene
    let root_nodes: HashSet<usize> = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| scene.nodes().map(|node| node.index()).collect())
        .unwrap_or_default();

    let mut clips = Vec::new();
    for animation in document.animations() {
        let name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation_{}", animation.index()));

        let mut duration = 0.0f32;
        let mut root_motion = None;

        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));
            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            if let Some(&last) = times.last() {
                duration = duration.max(last);
            }

            let target = channel.target();
            if root_motion.is_some()
                || target.property() != Property::Translation
                || !root_nodes.contains(&target.node().index())
            {
                continue;
            }

            if let Some(ReadOutputs::Translations(values)) = reader.read_outputs() {
                root_motion = TranslationTrack::new(times, values.map(Vec3::from).collect());
            }
        }

        clips.push(AnimationClip::new(&name, duration).with_root_motion(root_motion));
    }

    let bounds = document
        .meshes()
        .flat_map(|mesh| mesh.primitives())
        .map(|primitive| {
            let bb = primitive.bounding_box();
            Bounds {
                min: Vec3::from(bb.min),
                max: Vec3::from(bb.max),
            }
        })
        .reduce(Bounds::union);

    Ok(LoadedModel { clips, bounds })
}

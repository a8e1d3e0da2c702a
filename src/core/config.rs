// Stage configuration loaded from TOML

use crate::stage::animation::{IDLE, KNOWN_ANIMATIONS};
use log::{info, warn};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "scroll_stage.toml";

/// Environment variable overriding the config path
pub const CONFIG_ENV_VAR: &str = "SCROLL_STAGE_CONFIG";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// What the controller does when a requested clip is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Request "idle" once instead
    #[default]
    Idle,
    /// Keep the previous animation
    None,
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub model: ModelConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub ground: GroundConfig,
    pub observer: ObserverConfig,
    pub animation: AnimationConfig,
    pub page: PageConfig,
    /// Section id -> animation name
    pub section_animations: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub position: [f32; 3],
    pub scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Offset from the character while following it
    pub follow_offset: [f32; 3],
    pub background: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar_angle: f32,
    /// Orbit pivot once the model has loaded
    pub target_on_load: [f32; 3],
    /// Radians per dragged pixel
    pub rotate_speed: f32,
    /// Distance multiplier per zoom notch
    pub zoom_step: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub size: [f32; 3],
    pub color: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Pixels the viewport's bottom edge is pulled inward
    pub root_margin_bottom: f32,
    /// Fraction of a section that must be visible
    pub threshold: f32,
    /// Start observing sections only once the model exists
    pub observe_after_load: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub initial: String,
    pub fallback: FallbackPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub sections: Vec<SectionConfig>,
    /// Pixels scrolled per wheel line
    pub line_height: f32,
    /// Fraction of the viewport scrolled by PageUp/PageDown
    pub page_step_ratio: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub height: f32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        let section_animations = [
            ("hero", "idle"),
            ("hello", "hello"),
            ("giveaway", "break"),
            ("capabilities", "pose"),
            ("store", "walk"),
            ("thanks", "thanks"),
            ("contactForm", "phone"),
        ]
        .into_iter()
        .map(|(section, animation)| (section.to_string(), animation.to_string()))
        .collect();

        Self {
            model: ModelConfig::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            ground: GroundConfig::default(),
            observer: ObserverConfig::default(),
            animation: AnimationConfig::default(),
            page: PageConfig::default(),
            section_animations,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/models/character.glb"),
            position: [0.0, 0.02, 0.0],
            scale: 1.5,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, -1.0, 5.0],
            follow_offset: [0.0, 1.0, 5.0],
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.25,
            min_distance: 4.0,
            max_distance: 20.0,
            max_polar_angle: std::f32::consts::FRAC_PI_2,
            target_on_load: [0.0, 1.5, 0.0],
            rotate_speed: 0.005,
            zoom_step: 0.95,
        }
    }
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: [2000.0, 0.1, 2000.0],
            color: 0x1f2022,
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            root_margin_bottom: 100.0,
            threshold: 0.1,
            observe_after_load: false,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            initial: IDLE.to_string(),
            fallback: FallbackPolicy::Idle,
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        let sections = [
            "hero",
            "hello",
            "giveaway",
            "capabilities",
            "store",
            "thanks",
            "contactForm",
            "footer",
        ]
        .into_iter()
        .map(|id| SectionConfig {
            id: id.to_string(),
            height: if id == "footer" { 400.0 } else { 900.0 },
        })
        .collect();

        Self {
            sections,
            line_height: 40.0,
            page_step_ratio: 0.9,
        }
    }
}

impl ShowcaseConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ShowcaseConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, falling back to the built-in defaults when it doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "No config at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let config = Self::load_from_file(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config path: first CLI argument, then the environment, then the default
    pub fn resolve_path(cli_arg: Option<String>) -> PathBuf {
        cli_arg
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Check value ranges and cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for section in &self.page.sections {
            if section.height <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "section '{}' must have a positive height, got {}",
                    section.id, section.height
                )));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
        }

        for (field, value) in [
            ("model.scale", self.model.scale),
            ("camera.near", self.camera.near),
            ("controls.zoom_step", self.controls.zoom_step),
            ("page.line_height", self.page.line_height),
            ("page.page_step_ratio", self.page.page_step_ratio),
        ] {
            require_positive(field, value)?;
        }

        if self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(format!(
                "camera.far ({}) must exceed camera.near ({})",
                self.camera.far, self.camera.near
            )));
        }

        if !(0.0..=1.0).contains(&self.observer.threshold) {
            return Err(ConfigError::Invalid(format!(
                "observer threshold must be within [0, 1], got {}",
                self.observer.threshold
            )));
        }

        if self.controls.min_distance > self.controls.max_distance {
            return Err(ConfigError::Invalid(format!(
                "controls.min_distance ({}) exceeds controls.max_distance ({})",
                self.controls.min_distance, self.controls.max_distance
            )));
        }

        if !(0.0..=1.0).contains(&self.controls.damping_factor) {
            return Err(ConfigError::Invalid(format!(
                "controls.damping_factor must be within [0, 1], got {}",
                self.controls.damping_factor
            )));
        }

        for (section, animation) in &self.section_animations {
            if !KNOWN_ANIMATIONS.contains(&animation.as_str()) {
                warn!(
                    "Section '{}' maps to unrecognised animation '{}'",
                    section, animation
                );
            }
        }

        Ok(())
    }
}

fn require_positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be positive, got {}",
            field, value
        )))
    }
}

// Core utilities: configuration and math

pub mod config;
pub mod math;

pub use config::{ConfigError, FallbackPolicy, ShowcaseConfig};

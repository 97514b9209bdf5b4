//! # Configuration System
//!
//! Serializable settings for the engine and the scene pipeline, loadable from
//! TOML or RON files.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging, debug features, frame pacing
//! - **Scene Config**: clip distances, field of view, ambient term, viewport

use serde::{Deserialize, Serialize};
use std::path::Path;

/// File formats a [`Config`] can be read from and written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration text in the given format
    fn from_str_with(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render configuration text in the given format
    fn to_string_with(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loading {format:?} configuration from {}", path.display());
        Self::from_str_with(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_with(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Engine Configuration
///
/// Process-wide behavior: logging, debug features and frame pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
    /// Target FPS for frame rate limiting
    pub target_fps: Option<u32>,
}

impl EngineConfig {
    /// Create a new engine configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
            target_fps: None,
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Set target FPS
    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// Camera clip distances, lighting constants and the initial viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Near clip distance
    pub screen_near: f32,
    /// Far clip distance
    pub screen_depth: f32,
    /// Vertical field of view given to cameras created without one
    pub field_of_view_degrees: f32,
    /// Ambient light term written into the per-frame payload
    pub global_ambient: [f32; 4],
    /// Whether `Scene::render` builds a frustum and culls against it
    pub enable_frustum_culling: bool,
    /// Initial viewport width in pixels
    pub viewport_width: u32,
    /// Initial viewport height in pixels
    pub viewport_height: u32,
    /// Blinn-Phong instead of Phong specular in the lit shader
    pub specular_blinn: bool,
}

impl SceneConfig {
    /// Create a scene configuration with the default constants
    #[must_use]
    pub const fn new() -> Self {
        Self {
            screen_near: 0.1,
            screen_depth: 1000.0,
            field_of_view_degrees: 45.0,
            global_ambient: [0.2, 0.2, 0.2, 1.0],
            enable_frustum_culling: true,
            viewport_width: 800,
            viewport_height: 600,
            specular_blinn: false,
        }
    }

    /// Set the clip distances
    #[must_use]
    pub const fn with_clip_planes(mut self, near: f32, depth: f32) -> Self {
        self.screen_near = near;
        self.screen_depth = depth;
        self
    }

    /// Set the initial viewport
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Enable or disable frustum culling
    #[must_use]
    pub const fn with_frustum_culling(mut self, enabled: bool) -> Self {
        self.enable_frustum_culling = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(format!(
                "Viewport must have a non-zero area, got {}x{}",
                self.viewport_width, self.viewport_height
            ));
        }

        if !(self.screen_near > 0.0 && self.screen_near < self.screen_depth) {
            return Err(format!(
                "Clip planes must satisfy 0 < near < far, got near={} far={}",
                self.screen_near, self.screen_depth
            ));
        }

        if !(self.field_of_view_degrees > 0.0 && self.field_of_view_degrees < 180.0) {
            return Err(format!(
                "Field of view must be within (0, 180) degrees, got {}",
                self.field_of_view_degrees
            ));
        }

        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration the demo binary loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene pipeline configuration
    pub scene: SceneConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate().map_err(ConfigError::Invalid)
    }
}

impl Config for ApplicationConfig {}

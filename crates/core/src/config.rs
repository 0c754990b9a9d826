//! Demo configuration: window, projection, and animation settings.
//!
//! Defaults describe the stock demo (800x600 window, 0.4 scale, one
//! degree of rotation per frame, 32/32/32 clear color). A JSON file can
//! override any subset of fields; unspecified fields keep their defaults.
//! CLI flags in the demo binary override both.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {message}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// The underlying I/O error text.
        message: String,
    },
    /// The config file is not valid JSON for [`DemoConfig`].
    #[error("invalid config JSON: {0}")]
    Parse(String),
    /// A field value is outside its allowed range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Animation settings for the spinning tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinSettings {
    /// Rotation around the Y axis per frame, in degrees.
    pub degrees_per_frame: f32,
    /// Horizontal offset change per frame.
    pub offset_increment: f32,
    /// Offset magnitude at which the bounce direction flips.
    pub max_offset: f32,
    /// Uniform model scale.
    pub scale: f32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            degrees_per_frame: 1.0,
            offset_increment: 0.005,
            max_offset: 0.7,
            scale: 0.4,
        }
    }
}

/// Top-level demo configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Background clear color, linear RGB in [0, 1].
    pub clear_color: [f32; 3],
    /// Vertical field of view of the projection, in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub z_near: f32,
    /// Far clip plane distance.
    pub z_far: f32,
    /// Animation settings.
    pub spin: SpinSettings,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "glimpse".to_string(),
            clear_color: [32.0 / 255.0; 3],
            fov_y_degrees: 45.0,
            z_near: 0.1,
            z_far: 100.0,
            spin: SpinSettings::default(),
        }
    }
}

impl DemoConfig {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, plus the
    /// errors of [`DemoConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Checks every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.z_near > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "z_near must be positive, got {}",
                self.z_near
            )));
        }
        if self.z_far <= self.z_near {
            return Err(ConfigError::Invalid(format!(
                "z_far ({}) must exceed z_near ({})",
                self.z_far, self.z_near
            )));
        }
        if !(self.spin.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spin.scale must be positive, got {}",
                self.spin.scale
            )));
        }
        if self.spin.max_offset < 0.0 || self.spin.offset_increment < 0.0 {
            return Err(ConfigError::Invalid(
                "spin offsets must be non-negative".to_string(),
            ));
        }
        for (i, channel) in self.clear_color.iter().enumerate() {
            if !(0.0..=1.0).contains(channel) {
                return Err(ConfigError::Invalid(format!(
                    "clear_color[{i}] must be in [0, 1], got {channel}"
                )));
            }
        }
        Ok(())
    }
}

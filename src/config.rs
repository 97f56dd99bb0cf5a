//! Editor configuration supplied by the host page as JSON.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{DEFAULT_RESOLUTION_H, DEFAULT_RESOLUTION_W};
use crate::space::Size;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_IMAGE_PATH_TEMPLATE: &str = "/uploads/{filename}";
const FILENAME_PLACEHOLDER: &str = "{filename}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("image path template must contain {{filename}}: {0}")]
    MissingPlaceholder(String),
    #[error("default resolution must be positive, got {width}x{height}")]
    InvalidResolution { width: f64, height: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Base address of the config/upload service, without a trailing slash.
    pub api_base_url: String,
    /// Path appended to the base address; `{filename}` is replaced.
    pub image_path_template: String,
    /// Resolution assumed for displays that report none.
    pub default_resolution: Size,
    /// Clamp pointer-dragged quad points to the unit square.
    pub clamp_pointer_quad: bool,
    /// Flip negative-extent rects back to positive on pointer-up.
    pub normalize_rects_on_release: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_path_template: DEFAULT_IMAGE_PATH_TEMPLATE.to_string(),
            default_resolution: Size::new(DEFAULT_RESOLUTION_W, DEFAULT_RESOLUTION_H),
            clamp_pointer_quad: false,
            normalize_rects_on_release: false,
        }
    }
}

impl EditorConfig {
    /// Parse and validate config from JSON. Absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON, a template without
    /// `{filename}`, or a non-positive default resolution.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.image_path_template.contains(FILENAME_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(self.image_path_template.clone()));
        }
        if !self.default_resolution.is_positive() {
            return Err(ConfigError::InvalidResolution {
                width: self.default_resolution.width,
                height: self.default_resolution.height,
            });
        }
        Ok(())
    }

    /// URL of an uploaded image.
    #[must_use]
    pub fn image_url(&self, filename: &str) -> String {
        let path = self.image_path_template.replace(FILENAME_PLACEHOLDER, filename);
        if path.starts_with('/') {
            format!("{}{path}", self.api_base_url)
        } else {
            format!("{}/{path}", self.api_base_url)
        }
    }
}

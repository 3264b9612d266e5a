//! Studio configuration.
//!
//! Defaults cover everything but the API key, which only ever comes from the
//! `OPENROUTER_KEY` environment variable. An optional TOML file can override
//! any field; unknown keys are rejected.
//!
//! ```toml
//! model = "google/gemini-2.5-flash"
//! temperature = 0.7
//! request_timeout_secs = 90
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StudioError;
use crate::{DEFAULT_IMAGE_MODEL, DEFAULT_MODEL};

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Model for structured and freeform calls.
    pub model: String,
    /// Model for image calls.
    pub image_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    pub referer: String,
    /// Sent as `X-Title` for OpenRouter attribution.
    pub title: String,
    /// Transport timeout of the HTTP client, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.9,
            referer: "https://github.com/neo-tokyo-noir/noir-studio".to_string(),
            title: "Neo-Tokyo Noir Studio".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl StudioConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, StudioError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, StudioError> {
        let text = std::fs::read_to_string(path).map_err(|e| StudioError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let config = Self::from_toml(&text)?;
        debug!(
            "Loaded config from {}: model={}, image_model={}",
            path.display(),
            config.model,
            config.image_model
        );
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, StudioError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Read the API key from [`API_KEY_ENV`].
pub fn api_key_from_env() -> Result<String, StudioError> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(StudioError::Config {
            message: format!("{API_KEY_ENV} is not set"),
        }),
    }
}

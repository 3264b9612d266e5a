//! Generative content studio for the Neo-Tokyo Noir setting.
//!
//! `noir-studio` turns short free-text inputs into typed creative records
//! (character dossiers, location guides, storyboards, glossaries, and more)
//! by calling a hosted model through the
//! [OpenRouter](https://openrouter.ai/) chat completions API.
//!
//! The pieces, bottom-up:
//!
//! - [`schema`]: the closed set of Result Types and the field descriptors
//!   that drive prompts, validation, rendering, and export.
//! - [`prompt`]: pure, deterministic prompt compilation.
//! - [`completion`]: the backend seam ([`CompletionBackend`]) and the
//!   client that turns raw model output into typed values.
//! - [`batch`]: sequential fixed-list generation with progress events.
//! - [`render`] and [`export`]: display panels and Markdown/CSV files.
//! - [`studio`]: the feature-invocation boundary that validates inputs,
//!   serializes calls per feature, and scopes errors to the feature.
//!
//! # Getting started
//!
//! ```ignore
//! use noir_studio::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StudioError> {
//!     let config = StudioConfig::default();
//!     let client = OpenRouterClient::from_config(api_key_from_env()?, &config)?;
//!     let studio = Studio::new(CompletionClient::new(client));
//!
//!     let inputs = Inputs::new()
//!         .with("name", "Rei Kisaragi")
//!         .with("concept", "disgraced detective with a chrome arm");
//!     let result = studio.generate(Feature::CharacterProfile, &inputs).await?;
//!
//!     let file = export(&result);
//!     std::fs::write(&file.filename, &file.content).ok();
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod chat;
pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod matrix;
pub mod prelude;
pub mod prompt;
pub mod render;
pub mod roster;
pub mod schema;
pub mod studio;

#[cfg(test)]
mod test_support;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::StudioConfig;
use crate::error::{ModelCommunicationError, StudioError};

pub use completion::{CompletionBackend, CompletionClient, GeneratedImage};

// Re-export schemars so downstream crates can derive JsonSchema on their own
// types without a direct dependency.
pub use schemars;

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for structured and freeform calls.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default model for image calls.
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";

/// Every generated image is requested and labelled as PNG.
pub const IMAGE_MIME: &str = "image/png";

/// Fixed portrait aspect ratio for image calls.
pub const IMAGE_ASPECT_RATIO: &str = "3:4";

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`. The completion client validates model output
/// against this before deserializing.
///
/// # Example
///
/// ```
/// use noir_studio::json_schema_for;
/// use noir_studio::schema::DialogueTree;
///
/// let schema = json_schema_for::<DialogueTree>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"branches".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Only the fields the studio sends; unused
/// optional fields are omitted from serialization.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    // Image generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<Modality>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}
fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

/// JSON output format type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ResponseFormatType {
    #[serde(rename = "json_object")]
    JsonObject,
    #[serde(rename = "json_schema")]
    JsonSchema,
}

/// JSON output mode.
#[derive(Serialize, Debug)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub fmt_type: ResponseFormatType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchemaFormat>,
}

impl ResponseFormat {
    /// Constrain output to `schema`. Strict mode requires every property to
    /// be listed as required, so it is only enabled for schemas without
    /// optional fields.
    pub fn json_schema(name: impl Into<String>, strict: bool, schema: serde_json::Value) -> Self {
        Self {
            fmt_type: ResponseFormatType::JsonSchema,
            json_schema: Some(JsonSchemaFormat {
                name: name.into(),
                strict,
                schema,
            }),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

/// Output modality requested from multimodal models.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Text,
}

#[derive(Serialize, Debug)]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

// ── Message types ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
    #[serde(default)]
    images: Vec<RawImage>,
}

#[derive(Deserialize, Debug)]
struct RawImage {
    image_url: RawImageUrl,
}

#[derive(Deserialize, Debug)]
struct RawImageUrl {
    url: String,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from `OpenRouterClient::chat()`.
#[derive(Debug, Default)]
pub struct ChatCompletion {
    pub content: Option<String>,
    /// Image URLs in returned order, usually `data:` URLs.
    pub images: Vec<String>,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) referer: String,
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) config: StudioConfig,
}

impl OpenRouterClient {
    /// Create a client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self, StudioError> {
        Self::from_config(api_key, &StudioConfig::default())
    }

    /// Create a client using the models, headers, and timeout in `config`.
    pub fn from_config(
        api_key: impl Into<String>,
        config: &StudioConfig,
    ) -> Result<Self, StudioError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("noir-studio/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StudioError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            url: OPENROUTER_URL.to_string(),
            config: config.clone(),
        })
    }

    /// Point the client at a different endpoint (a proxy or a local stub).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion, ModelCommunicationError> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}, schema={}, image={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
            body.response_format.is_some(),
            body.modalities.is_some(),
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelCommunicationError::transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ModelCommunicationError::transport(format!("failed to read response: {e}")))?;

        let elapsed = start.elapsed();
        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            elapsed.as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(ModelCommunicationError::http(status.as_u16(), text));
        }

        parse_completion(&text)
    }
}

/// Decode a 2xx response body.
fn parse_completion(text: &str) -> Result<ChatCompletion, ModelCommunicationError> {
    let parsed: RawChatResponse = serde_json::from_str(text)
        .map_err(|e| ModelCommunicationError::malformed(format!("failed to parse response: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(ModelCommunicationError::api(err.message));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    let Some(choice) = parsed.choices.and_then(|c| c.into_iter().next()) else {
        debug!("LLM output: empty (no choices)");
        return Ok(ChatCompletion {
            usage: parsed.usage,
            ..Default::default()
        });
    };

    debug!(
        "LLM output: {} chars text, {} image(s)",
        choice.message.content.as_ref().map_or(0, |s| s.len()),
        choice.message.images.len()
    );

    Ok(ChatCompletion {
        content: choice.message.content,
        images: choice
            .message
            .images
            .into_iter()
            .map(|i| i.image_url.url)
            .collect(),
        usage: parsed.usage,
        finish_reason: choice.finish_reason,
    })
}

//! Model completion: the backend seam and the typed client on top of it.
//!
//! A [`CompletionBackend`] moves raw text and image bytes; it knows nothing
//! about Result Types. [`CompletionClient`] owns the contract: it strips an
//! optional code fence, parses, validates against the type's schema, and
//! only then deserializes. A call either yields a complete value or a
//! [`ModelCommunicationError`]; there are no partial results, no retries,
//! and no caching.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ModelCommunicationError;
use crate::schema::{ResultType, SchemaDescriptor};
use crate::{
    ChatRequest, IMAGE_ASPECT_RATIO, IMAGE_MIME, ImageConfig, Message, Modality, OpenRouterClient,
    ResponseFormat, json_schema_for,
};

/// Boxed future returned by backend operations.
pub type CompletionFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ModelCommunicationError>> + Send + 'a>>;

/// One generated image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime: IMAGE_MIME.to_string(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }
}

/// Raw access to a hosted model.
///
/// Implementations must be object-safe so the client can hold any backend
/// behind an `Arc<dyn CompletionBackend>`.
pub trait CompletionBackend: Send + Sync {
    /// Send `prompt` with `descriptor`'s JSON schema as the response format.
    /// Returns the model's raw text.
    fn complete_structured<'a>(
        &'a self,
        prompt: &'a str,
        descriptor: &'a SchemaDescriptor,
    ) -> CompletionFuture<'a, String>;

    /// Send `prompt`, return the model's raw text.
    fn complete_text<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, String>;

    /// Request image output for `prompt`. May return zero images.
    fn complete_image<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, Vec<GeneratedImage>>;
}

// ── OpenRouter backend ─────────────────────────────────────────────

impl CompletionBackend for OpenRouterClient {
    fn complete_structured<'a>(
        &'a self,
        prompt: &'a str,
        descriptor: &'a SchemaDescriptor,
    ) -> CompletionFuture<'a, String> {
        Box::pin(async move {
            let body = ChatRequest {
                model: self.config.model.clone(),
                messages: vec![Message::user(prompt)],
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                response_format: Some(ResponseFormat::json_schema(
                    descriptor.name,
                    !descriptor.has_optional_fields(),
                    descriptor.json_schema(),
                )),
                ..Default::default()
            };
            let completion = self.chat(&body).await?;
            Ok(completion.content.unwrap_or_default())
        })
    }

    fn complete_text<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, String> {
        Box::pin(async move {
            let body = ChatRequest {
                model: self.config.model.clone(),
                messages: vec![Message::user(prompt)],
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                ..Default::default()
            };
            let completion = self.chat(&body).await?;
            Ok(completion.content.unwrap_or_default())
        })
    }

    fn complete_image<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, Vec<GeneratedImage>> {
        Box::pin(async move {
            let body = ChatRequest {
                model: self.config.image_model.clone(),
                messages: vec![Message::user(prompt)],
                modalities: Some(vec![Modality::Image, Modality::Text]),
                n: Some(1),
                image_config: Some(ImageConfig {
                    aspect_ratio: IMAGE_ASPECT_RATIO.to_string(),
                }),
                ..Default::default()
            };
            let completion = self.chat(&body).await?;
            decode_first_image(&completion.images)
        })
    }
}

/// Decode only the first returned image; the rest are never looked at.
/// No images gives an empty list.
fn decode_first_image(urls: &[String]) -> Result<Vec<GeneratedImage>, ModelCommunicationError> {
    if urls.len() > 1 {
        debug!("Image call returned {} images, keeping the first", urls.len());
    }
    urls.first()
        .map(|url| decode_data_url(url))
        .into_iter()
        .collect()
}

/// Decode a `data:<mime>;base64,<payload>` URL, keeping the declared MIME
/// type. A URL that declares none is taken as [`IMAGE_MIME`].
pub fn decode_data_url(url: &str) -> Result<GeneratedImage, ModelCommunicationError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ModelCommunicationError::malformed("image is not a data URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ModelCommunicationError::malformed("image data URL has no payload"))?;
    let Some(mime) = meta.strip_suffix(";base64") else {
        return Err(ModelCommunicationError::malformed(
            "image data URL is not base64-encoded",
        ));
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ModelCommunicationError::malformed(format!("bad image payload: {e}")))?;
    let mime = match mime.trim() {
        "" => IMAGE_MIME,
        declared => declared,
    };
    Ok(GeneratedImage {
        mime: mime.to_string(),
        bytes,
    })
}

// ── Typed client ───────────────────────────────────────────────────

/// Typed front end over a [`CompletionBackend`]. Cheap to clone.
#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
}

impl CompletionClient {
    pub fn new(backend: impl CompletionBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Structured mode: one complete `T` or an error.
    pub async fn complete<T: ResultType>(&self, prompt: &str) -> Result<T, ModelCommunicationError> {
        let descriptor = T::DESCRIPTOR;
        let raw = self.backend.complete_structured(prompt, &descriptor).await?;
        parse_structured::<T>(&raw).inspect_err(|e| {
            warn!("{} output rejected: {e}", descriptor.name);
        })
    }

    /// Freeform mode: trimmed text. Blank output is an error.
    pub async fn complete_text(&self, prompt: &str) -> Result<String, ModelCommunicationError> {
        let raw = self.backend.complete_text(prompt).await?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(ModelCommunicationError::empty("the model returned no text"));
        }
        Ok(text.to_string())
    }

    /// Image mode: the first returned image. Zero images is an error.
    pub async fn complete_image(
        &self,
        prompt: &str,
    ) -> Result<GeneratedImage, ModelCommunicationError> {
        let images = self.backend.complete_image(prompt).await?;
        debug!("Image call returned {} image(s)", images.len());
        images
            .into_iter()
            .next()
            .ok_or_else(ModelCommunicationError::no_images)
    }
}

/// Turn raw structured output into `T`.
pub fn parse_structured<T: ResultType>(raw: &str) -> Result<T, ModelCommunicationError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ModelCommunicationError::empty("the model returned no output"));
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ModelCommunicationError::malformed(format!("output is not JSON: {e}")))?;

    validate_against(&json_schema_for::<T>(), &value, T::DESCRIPTOR.name)?;

    serde_json::from_value(value).map_err(|e| {
        ModelCommunicationError::schema_violation(format!(
            "output does not match {}: {e}",
            T::DESCRIPTOR.name
        ))
    })
}

/// Check `value` against `schema`. A schema that cannot be compiled is an
/// error too; output is never let through unchecked.
fn validate_against(
    schema: &Value,
    value: &Value,
    type_name: &str,
) -> Result<(), ModelCommunicationError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        warn!("Schema for {type_name} failed to compile: {e}");
        ModelCommunicationError::schema_violation(format!(
            "cannot validate {type_name} output: invalid schema: {e}"
        ))
    })?;
    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{}: {e}", e.instance_path()))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ModelCommunicationError::schema_violation(format!(
            "output does not match {type_name}: {}",
            errors.join("; ")
        )))
    }
}

/// Remove one surrounding Markdown code fence (with optional language tag).
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match body.split_once('\n') {
        Some((_tag, inner)) => inner.trim(),
        None => body.trim(),
    }
}

// ── Scripted backend ───────────────────────────────────────────────

/// One canned backend reply.
#[derive(Clone, Debug)]
pub enum ScriptedReply {
    Text(String),
    Images(Vec<GeneratedImage>),
    Fail(ModelCommunicationError),
}

/// In-memory backend that replays canned replies in order and records
/// every prompt it receives. Used by tests and by offline front ends.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, reply: impl Into<String>) -> Self {
        self.push(ScriptedReply::Text(reply.into()))
    }

    pub fn images(self, images: Vec<GeneratedImage>) -> Self {
        self.push(ScriptedReply::Images(images))
    }

    pub fn fail(self, err: ModelCommunicationError) -> Self {
        self.push(ScriptedReply::Fail(err))
    }

    pub fn push(self, reply: ScriptedReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Queue a reply on a shared backend.
    pub fn enqueue(&self, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next(&self, prompt: &str) -> Result<ScriptedReply, ModelCommunicationError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        match self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(ScriptedReply::Fail(err)) => Err(err),
            Some(reply) => Ok(reply),
            None => Err(ModelCommunicationError::transport("no scripted reply left")),
        }
    }

    fn next_text(&self, prompt: &str) -> Result<String, ModelCommunicationError> {
        match self.next(prompt)? {
            ScriptedReply::Text(text) => Ok(text),
            _ => Err(ModelCommunicationError::malformed("scripted reply is not text")),
        }
    }
}

impl CompletionBackend for ScriptedBackend {
    fn complete_structured<'a>(
        &'a self,
        prompt: &'a str,
        _descriptor: &'a SchemaDescriptor,
    ) -> CompletionFuture<'a, String> {
        Box::pin(async move { self.next_text(prompt) })
    }

    fn complete_text<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, String> {
        Box::pin(async move { self.next_text(prompt) })
    }

    fn complete_image<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, Vec<GeneratedImage>> {
        Box::pin(async move {
            match self.next(prompt)? {
                ScriptedReply::Images(images) => Ok(images),
                _ => Err(ModelCommunicationError::malformed(
                    "scripted reply is not an image list",
                )),
            }
        })
    }
}

impl<B: CompletionBackend + ?Sized> CompletionBackend for Arc<B> {
    fn complete_structured<'a>(
        &'a self,
        prompt: &'a str,
        descriptor: &'a SchemaDescriptor,
    ) -> CompletionFuture<'a, String> {
        (**self).complete_structured(prompt, descriptor)
    }

    fn complete_text<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, String> {
        (**self).complete_text(prompt)
    }

    fn complete_image<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, Vec<GeneratedImage>> {
        (**self).complete_image(prompt)
    }
}

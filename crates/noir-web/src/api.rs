//! REST API endpoint handlers.
//!
//! Every handler is a thin shim over [`Studio`]: parse the path and body,
//! call the operation, and map the result to JSON. Failures come back as
//! `{"error": "<user message>", "feature": "<id>"}` with a status chosen
//! from the error kind.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use noir_studio::error::UnknownFeature;
use noir_studio::prelude::*;
use noir_studio::render::headline;
use noir_studio::schema::{InputSpec, registry};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;

use crate::broadcast::{BroadcastObserver, WsMessage};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Studio>,
    pub broadcast_tx: broadcast::Sender<WsMessage>,
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    feature: Option<Feature>,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            feature: None,
        }
    }
}

impl From<StudioError> for ApiError {
    fn from(err: StudioError) -> Self {
        let status = match &err {
            StudioError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            StudioError::Busy { .. } => StatusCode::CONFLICT,
            StudioError::UnsupportedMode { .. } => StatusCode::BAD_REQUEST,
            StudioError::Communication { .. } | StudioError::Batch { .. } => {
                StatusCode::BAD_GATEWAY
            }
            StudioError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.user_message(),
            feature: err.feature(),
        }
    }
}

impl From<UnknownFeature> for ApiError {
    fn from(err: UnknownFeature) -> Self {
        Self::not_found(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message, "feature": self.feature });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── Catalogue ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FeatureInfo {
    pub id: Feature,
    pub title: &'static str,
    pub mode: Mode,
    pub inputs: &'static [InputSpec],
}

/// GET /api/features
pub async fn get_features() -> Json<Vec<FeatureInfo>> {
    Json(
        Feature::ALL
            .into_iter()
            .map(|feature| FeatureInfo {
                id: feature,
                title: feature.title(),
                mode: feature.mode(),
                inputs: feature.inputs(),
            })
            .collect(),
    )
}

/// GET /api/features/{id}/schema
///
/// 404 for unknown ids and for features without a Result Type.
pub async fn get_schema(Path(id): Path<String>) -> ApiResult<serde_json::Value> {
    let feature: Feature = id.parse()?;
    let descriptor = registry::descriptor(feature)
        .ok_or_else(|| ApiError::not_found(format!("{feature} has no Result Type")))?;
    Ok(Json(descriptor.json_schema()))
}

// ── Generation ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GenerateResponse {
    pub headline: String,
    pub result: GeneratedResult,
    pub panels: Vec<Panel>,
}

/// POST /api/generate/{id}. Body: the feature's inputs as a flat object.
pub async fn post_generate(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(inputs): Json<Inputs>,
) -> ApiResult<GenerateResponse> {
    let feature: Feature = id.parse()?;
    let result = app.studio.generate(feature, &inputs).await?;
    Ok(Json(GenerateResponse {
        headline: headline(&result),
        panels: panels(&result),
        result,
    }))
}

#[derive(Serialize)]
pub struct ArtPromptResponse {
    pub prompt: String,
}

/// POST /api/art-prompt
pub async fn post_art_prompt(
    State(app): State<AppState>,
    Json(inputs): Json<Inputs>,
) -> ApiResult<ArtPromptResponse> {
    let prompt = app.studio.art_prompt(&inputs).await?;
    Ok(Json(ArtPromptResponse { prompt }))
}

#[derive(Serialize)]
pub struct ImageResponse {
    pub mime: String,
    pub data_url: String,
}

/// POST /api/image
pub async fn post_image(
    State(app): State<AppState>,
    Json(inputs): Json<Inputs>,
) -> ApiResult<ImageResponse> {
    let image = app.studio.image(&inputs).await?;
    Ok(Json(ImageResponse {
        data_url: image.to_data_url(),
        mime: image.mime,
    }))
}

// ── Batches and the matrix ─────────────────────────────────────────

#[derive(Serialize)]
pub struct BatchResponse {
    pub feature: Feature,
    pub total: usize,
    /// Results gathered before any failure, in list order.
    pub results: Vec<GeneratedResult>,
    /// Set when the run stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn batch_feature(kind: &str) -> Result<Feature, UnknownFeature> {
    match kind {
        "characters" => Ok(Feature::CharacterBatch),
        "locations" => Ok(Feature::LocationBatch),
        "scenes" => Ok(Feature::SceneMatrix),
        other => other.parse(),
    }
}

/// POST /api/batch/{kind}
///
/// `kind` is `characters`, `locations`, `scenes`, or a batch feature id.
/// Progress is broadcast on `/ws`. A partial run still answers 200 with the
/// results gathered so far and an `error` naming where it stopped.
pub async fn post_batch(
    State(app): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<BatchResponse> {
    let feature = batch_feature(&kind)?;
    let observer = CompositeObserver::new()
        .with(LoggingObserver)
        .with(BroadcastObserver::new(app.broadcast_tx.clone()));
    let outcome = app.studio.run_batch(feature, &observer).await?;
    Ok(Json(BatchResponse {
        feature,
        total: outcome.total,
        error: outcome.error().map(|e| e.user_message()),
        results: outcome.results,
    }))
}

#[derive(Serialize)]
pub struct MatrixResponse {
    pub entries: Vec<MatrixEntry>,
}

/// GET /api/matrix
pub async fn get_matrix(State(app): State<AppState>) -> Json<MatrixResponse> {
    Json(MatrixResponse {
        entries: app.studio.prompt_matrix(),
    })
}

// ── Export ─────────────────────────────────────────────────────────

/// Request body for POST /api/export. One of:
///
/// - `{"feature": "<batch id>", "results": [...]}`
/// - `{"result": {...}}`
/// - `{"matrix": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ExportRequest {
    Batch {
        feature: Feature,
        results: Vec<GeneratedResult>,
    },
    Single {
        result: GeneratedResult,
    },
    Matrix {
        matrix: Vec<MatrixEntry>,
    },
}

/// POST /api/export. Pure; makes no model call.
pub async fn post_export(Json(body): Json<ExportRequest>) -> Json<ExportFile> {
    Json(match body {
        ExportRequest::Batch { feature, results } => export_batch(feature, &results),
        ExportRequest::Single { result } => export(&result),
        ExportRequest::Matrix { matrix } => export_matrix(&matrix),
    })
}

// ── Guide chat ─────────────────────────────────────────────────────

/// Request body for POST /api/chat. The client owns the transcript.
#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub transcript: Transcript,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub transcript: Transcript,
}

/// POST /api/chat
///
/// Stateless: the transcript comes in with the message and goes back out
/// with the new turn appended. On failure the client keeps its own copy.
pub async fn post_chat(
    State(app): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let mut transcript = body.transcript;
    let reply = app.studio.guide_reply(&mut transcript, &body.message).await?;
    Ok(Json(ChatResponse { reply, transcript }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_kinds_map_to_features() {
        assert_eq!(batch_feature("characters"), Ok(Feature::CharacterBatch));
        assert_eq!(batch_feature("scenes"), Ok(Feature::SceneMatrix));
        assert_eq!(batch_feature("location-batch"), Ok(Feature::LocationBatch));
        assert!(batch_feature("villains").is_err());
    }

    #[test]
    fn studio_errors_map_to_statuses() {
        let err = ApiError::from(StudioError::Validation {
            feature: Feature::Glossary,
            field: "theme",
        });
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.feature, Some(Feature::Glossary));
        assert!(err.message.contains("Theme"));

        let err = ApiError::from(StudioError::Busy {
            feature: Feature::Outfit,
        });
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err = ApiError::from(StudioError::communication(
            Feature::Scene,
            ModelCommunicationError::no_images(),
        ));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn export_request_picks_variant_by_shape() {
        let body = r#"{"matrix":[{"character":"A","location":"B","prompt":"C"}]}"#;
        assert!(matches!(
            serde_json::from_str::<ExportRequest>(body).unwrap(),
            ExportRequest::Matrix { .. }
        ));

        let body = r#"{"feature":"character-batch","results":[]}"#;
        assert!(matches!(
            serde_json::from_str::<ExportRequest>(body).unwrap(),
            ExportRequest::Batch { .. }
        ));
    }

    #[test]
    fn chat_request_defaults_to_empty_transcript() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert!(req.transcript.is_empty());
        assert_eq!(req.message, "hello");
    }
}

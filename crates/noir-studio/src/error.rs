//! Error types for the studio.
//!
//! Every failure a feature can hit is caught at the feature-invocation
//! boundary ([`Studio`](crate::studio::Studio)) and surfaced as a
//! [`StudioError`]. [`StudioError::user_message`] gives the one-line,
//! feature-scoped text shown to the user. Nothing here is ever retried.

use std::fmt;

use thiserror::Error;

use crate::schema::Feature;

/// A feature id that is not in the catalogue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown feature id: {0}")]
pub struct UnknownFeature(pub String);

/// What went wrong talking to the model service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunicationKind {
    /// The request never completed (DNS, TLS, connection reset, timeout).
    Transport,
    /// The service answered with a non-2xx status.
    Http { status: u16 },
    /// The service answered 2xx with an error object in the body.
    Api,
    /// The body or the model's output was not parseable.
    MalformedResponse,
    /// The model's output parsed but did not match the expected shape.
    SchemaViolation,
    /// The model returned no usable text.
    EmptyResponse,
    /// The image endpoint returned zero images.
    NoImages,
}

impl fmt::Display for CommunicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunicationKind::Transport => write!(f, "request failed"),
            CommunicationKind::Http { status } => write!(f, "HTTP {status}"),
            CommunicationKind::Api => write!(f, "API error"),
            CommunicationKind::MalformedResponse => write!(f, "malformed response"),
            CommunicationKind::SchemaViolation => write!(f, "schema violation"),
            CommunicationKind::EmptyResponse => write!(f, "empty response"),
            CommunicationKind::NoImages => write!(f, "no images returned"),
        }
    }
}

/// Terminal failure of a single completion or image call.
///
/// Carries no retry guidance: the caller reports it and stops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ModelCommunicationError {
    pub kind: CommunicationKind,
    pub message: String,
}

impl ModelCommunicationError {
    pub fn new(kind: CommunicationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(CommunicationKind::Transport, message)
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::new(CommunicationKind::Http { status }, body)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(CommunicationKind::Api, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(CommunicationKind::MalformedResponse, message)
    }

    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::new(CommunicationKind::SchemaViolation, message)
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(CommunicationKind::EmptyResponse, message)
    }

    pub fn no_images() -> Self {
        Self::new(CommunicationKind::NoImages, "the image service returned zero images")
    }
}

/// Failure of one feature invocation.
#[derive(Error, Debug)]
pub enum StudioError {
    /// A required input was empty. No call was made.
    #[error("{feature}: input '{field}' is required")]
    Validation {
        feature: Feature,
        field: &'static str,
    },

    /// The feature already has a call in flight.
    #[error("{feature}: a request is already in flight")]
    Busy { feature: Feature },

    /// The operation does not apply to this feature's mode.
    #[error("{feature}: operation not supported for this feature")]
    UnsupportedMode { feature: Feature },

    /// The model call failed.
    #[error("{feature}: {source}")]
    Communication {
        feature: Feature,
        #[source]
        source: ModelCommunicationError,
    },

    /// A batch stopped at `subject`; `completed` earlier subjects succeeded.
    #[error("{feature}: stopped at '{subject}' after {completed}/{total}: {source}")]
    Batch {
        feature: Feature,
        subject: String,
        completed: usize,
        total: usize,
        #[source]
        source: ModelCommunicationError,
    },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl StudioError {
    pub fn communication(feature: Feature, source: ModelCommunicationError) -> Self {
        StudioError::Communication { feature, source }
    }

    /// The feature this error is scoped to, if any.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            StudioError::Validation { feature, .. }
            | StudioError::Busy { feature }
            | StudioError::UnsupportedMode { feature }
            | StudioError::Communication { feature, .. }
            | StudioError::Batch { feature, .. } => Some(*feature),
            StudioError::Config { .. } => None,
        }
    }

    /// Human-readable, feature-scoped message for display.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Validation { feature, field } => {
                let label = feature.input(field).map_or(*field, |i| i.label);
                format!("{}: please fill in {label}.", feature.title())
            }
            StudioError::Busy { feature } => {
                format!("{}: still working on the previous request.", feature.title())
            }
            StudioError::UnsupportedMode { feature } => {
                format!("{}: that action is not available here.", feature.title())
            }
            StudioError::Communication { feature, source } => {
                format!(
                    "{}: could not get a result from the model ({source}).",
                    feature.title()
                )
            }
            StudioError::Batch {
                feature,
                subject,
                completed,
                total,
                source,
            } => format!(
                "{}: generation stopped at {subject} ({completed} of {total} done): {source}.",
                feature.title()
            ),
            StudioError::Config { message } => format!("Configuration problem: {message}."),
        }
    }
}

impl From<toml::de::Error> for StudioError {
    fn from(err: toml::de::Error) -> Self {
        StudioError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn communication_error_display_includes_kind() {
        let err = ModelCommunicationError::http(503, "upstream overloaded");
        assert_eq!(err.to_string(), "HTTP 503: upstream overloaded");
        assert_eq!(err.kind, CommunicationKind::Http { status: 503 });
    }

    #[test]
    fn validation_message_uses_input_label() {
        let err = StudioError::Validation {
            feature: Feature::ArtPrompt,
            field: "mood",
        };
        assert_eq!(err.user_message(), "Art Prompt: please fill in Mood.");
        assert_eq!(err.feature(), Some(Feature::ArtPrompt));
    }

    #[test]
    fn batch_message_names_subject() {
        let err = StudioError::Batch {
            feature: Feature::CharacterBatch,
            subject: "Jin Akagawa".into(),
            completed: 2,
            total: 4,
            source: ModelCommunicationError::transport("connection reset"),
        };
        let msg = err.user_message();
        assert!(msg.contains("Jin Akagawa"));
        assert!(msg.contains("2 of 4"));
        assert!(msg.starts_with("Cast Dossiers:"));
    }

    #[test]
    fn config_error_has_no_feature() {
        let err = StudioError::Config {
            message: "bad".into(),
        };
        assert_eq!(err.feature(), None);
    }
}

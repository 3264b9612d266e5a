//! The feature-invocation boundary.
//!
//! Every user-triggered action goes through [`Studio`]. Each operation runs
//! the same steps: check the feature's mode, validate required inputs
//! (no call is made if one is missing), claim the feature's in-flight slot,
//! compile, call, release. A feature never has two calls outstanding;
//! different features may run at the same time. Failures come back as a
//! [`StudioError`] scoped to the feature, ready for
//! [`StudioError::user_message`].

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::batch::{self, BatchObserver, BatchOutcome};
use crate::chat::Transcript;
use crate::completion::{CompletionClient, GeneratedImage};
use crate::error::{ModelCommunicationError, StudioError};
use crate::matrix::{self, MatrixEntry};
use crate::prompt::{Inputs, compile, compile_art_prompt, compile_guide_turn, compile_image};
use crate::schema::*;

pub struct Studio {
    client: CompletionClient,
    in_flight: Mutex<HashSet<Feature>>,
}

/// Releases the feature's slot on drop.
struct InFlight<'a> {
    studio: &'a Studio,
    feature: Feature,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.studio
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.feature);
    }
}

impl Studio {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Whether `feature` has a call outstanding.
    pub fn is_busy(&self, feature: Feature) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&feature)
    }

    fn claim(&self, feature: Feature) -> Result<InFlight<'_>, StudioError> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(feature) {
            return Err(StudioError::Busy { feature });
        }
        Ok(InFlight {
            studio: self,
            feature,
        })
    }

    fn require_mode(feature: Feature, mode: Mode) -> Result<(), StudioError> {
        if feature.mode() == mode {
            Ok(())
        } else {
            Err(StudioError::UnsupportedMode { feature })
        }
    }

    fn fail(feature: Feature, err: ModelCommunicationError) -> StudioError {
        warn!("[{feature}] call failed: {err}");
        StudioError::communication(feature, err)
    }

    // ── Operations ─────────────────────────────────────────────────

    /// Run a structured feature and return its typed result.
    pub async fn generate(
        &self,
        feature: Feature,
        inputs: &Inputs,
    ) -> Result<GeneratedResult, StudioError> {
        Self::require_mode(feature, Mode::Structured)?;
        inputs.validate(feature)?;
        let _slot = self.claim(feature)?;

        let prompt = compile(feature, inputs);
        info!("[{feature}] generating ({} byte prompt)", prompt.len());
        let result = match feature {
            Feature::CharacterProfile => self.complete_as::<CharacterProfile>(&prompt).await,
            Feature::LocationProfile => self.complete_as::<LocationProfile>(&prompt).await,
            Feature::Scene => self.complete_as::<SceneCard>(&prompt).await,
            Feature::Storyboard => self.complete_as::<Storyboard>(&prompt).await,
            Feature::DialogueTree => self.complete_as::<DialogueTree>(&prompt).await,
            Feature::Glossary => self.complete_as::<Glossary>(&prompt).await,
            Feature::MissionBrief => self.complete_as::<MissionBrief>(&prompt).await,
            Feature::Faction => self.complete_as::<FactionProfile>(&prompt).await,
            Feature::Cyberware => self.complete_as::<CyberwareItem>(&prompt).await,
            Feature::NewsBulletin => self.complete_as::<NewsBulletin>(&prompt).await,
            Feature::Outfit => self.complete_as::<OutfitLook>(&prompt).await,
            Feature::TransformationSequence => {
                self.complete_as::<TransformationSequence>(&prompt).await
            }
            _ => return Err(StudioError::UnsupportedMode { feature }),
        };
        result.map_err(|e| Self::fail(feature, e))
    }

    async fn complete_as<T: ResultType>(
        &self,
        prompt: &str,
    ) -> Result<GeneratedResult, ModelCommunicationError> {
        self.client
            .complete::<T>(prompt)
            .await
            .map(ResultType::into_result)
    }

    /// Freeform art prompt from a transformation and a mood.
    pub async fn art_prompt(&self, inputs: &Inputs) -> Result<String, StudioError> {
        let feature = Feature::ArtPrompt;
        inputs.validate(feature)?;
        let _slot = self.claim(feature)?;

        info!("[{feature}] generating");
        self.client
            .complete_text(&compile_art_prompt(inputs))
            .await
            .map_err(|e| Self::fail(feature, e))
    }

    /// Render one image from a text prompt.
    pub async fn image(&self, inputs: &Inputs) -> Result<GeneratedImage, StudioError> {
        let feature = Feature::Image;
        inputs.validate(feature)?;
        let _slot = self.claim(feature)?;

        info!("[{feature}] rendering");
        let image = self
            .client
            .complete_image(&compile_image(inputs))
            .await
            .map_err(|e| Self::fail(feature, e))?;
        info!("[{feature}] got {} bytes of {}", image.bytes.len(), image.mime);
        Ok(image)
    }

    /// Send `message` to the city guide. On success the transcript gains the
    /// user's message and the reply, in that order; on failure it is left
    /// untouched.
    pub async fn guide_reply(
        &self,
        transcript: &mut Transcript,
        message: &str,
    ) -> Result<String, StudioError> {
        let feature = Feature::GuideChat;
        Inputs::new().with("message", message).validate(feature)?;
        let _slot = self.claim(feature)?;

        info!("[{feature}] turn {}", transcript.len() / 2 + 1);
        let reply = self
            .client
            .complete_text(&compile_guide_turn(transcript, message))
            .await
            .map_err(|e| Self::fail(feature, e))?;
        transcript.record_turn(message.to_string(), reply.clone());
        Ok(reply)
    }

    /// Run a batch feature over its fixed list.
    ///
    /// Returns the outcome even when the batch stopped early, so the caller
    /// keeps the results gathered before the failure; see
    /// [`BatchOutcome::error`].
    pub async fn run_batch(
        &self,
        feature: Feature,
        observer: &dyn BatchObserver,
    ) -> Result<BatchOutcome<GeneratedResult>, StudioError> {
        let (Some(element), Some(jobs)) = (registry::element_feature(feature), batch::jobs(feature))
        else {
            return Err(StudioError::UnsupportedMode { feature });
        };
        let _slot = self.claim(feature)?;

        let client = &self.client;
        let outcome = match element {
            Feature::CharacterProfile => {
                batch::run_batch::<CharacterProfile>(client, feature, &jobs, observer)
                    .await
                    .map(ResultType::into_result)
            }
            Feature::LocationProfile => {
                batch::run_batch::<LocationProfile>(client, feature, &jobs, observer)
                    .await
                    .map(ResultType::into_result)
            }
            Feature::Scene => batch::run_batch::<SceneCard>(client, feature, &jobs, observer)
                .await
                .map(ResultType::into_result),
            _ => return Err(StudioError::UnsupportedMode { feature }),
        };
        if let Some(err) = outcome.error() {
            warn!("{err}");
        }
        Ok(outcome)
    }

    /// The local prompt matrix. Makes no call.
    pub fn prompt_matrix(&self) -> Vec<MatrixEntry> {
        matrix::prompt_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::NoopObserver;
    use crate::chat::Speaker;
    use crate::completion::ScriptedBackend;
    use crate::error::CommunicationKind;
    use crate::test_support;
    use std::sync::Arc;

    fn studio(backend: ScriptedBackend) -> (Arc<ScriptedBackend>, Studio) {
        let backend = Arc::new(backend);
        let studio = Studio::new(CompletionClient::new(Arc::clone(&backend)));
        (backend, studio)
    }

    fn json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap()
    }

    fn character_inputs() -> Inputs {
        Inputs::new()
            .with("name", "Rei Kisaragi")
            .with("concept", "detective")
    }

    #[tokio::test]
    async fn generate_returns_typed_result() {
        let (backend, studio) = studio(ScriptedBackend::new().text(json(&test_support::character())));
        let result = studio
            .generate(Feature::CharacterProfile, &character_inputs())
            .await
            .unwrap();
        assert_eq!(result, test_support::character().into_result());
        assert!(backend.prompts()[0].contains("Rei Kisaragi"));
        assert!(!studio.is_busy(Feature::CharacterProfile));
    }

    #[tokio::test]
    async fn missing_input_makes_no_call() {
        let (backend, studio) = studio(ScriptedBackend::new());
        let err = studio
            .generate(Feature::CharacterProfile, &Inputs::new().with("name", "Rei"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Validation { field: "concept", .. }));
        assert_eq!(err.user_message(), "Character Profile: please fill in Concept.");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn unparseable_output_is_a_scoped_communication_error() {
        let (_backend, studio) = studio(ScriptedBackend::new().text("{\"name\": \"Rei\"}"));
        let err = studio
            .generate(Feature::CharacterProfile, &character_inputs())
            .await
            .unwrap_err();
        let StudioError::Communication { feature, source } = &err else {
            panic!("expected communication error, got {err:?}");
        };
        assert_eq!(*feature, Feature::CharacterProfile);
        assert_eq!(source.kind, CommunicationKind::SchemaViolation);
        assert!(err.user_message().starts_with("Character Profile:"));
        assert!(!studio.is_busy(Feature::CharacterProfile));
    }

    #[tokio::test]
    async fn generate_rejects_non_structured_features() {
        let (_backend, studio) = studio(ScriptedBackend::new());
        let err = studio
            .generate(Feature::Image, &Inputs::new().with("prompt", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::UnsupportedMode { .. }));
    }

    #[tokio::test]
    async fn second_call_on_busy_feature_is_rejected() {
        let (backend, studio) = studio(ScriptedBackend::new().text(json(&test_support::scene())));
        let slot = studio.claim(Feature::CharacterProfile).unwrap();
        let err = studio
            .generate(Feature::CharacterProfile, &character_inputs())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Busy { .. }));

        // Other features are unaffected.
        let scene = studio
            .generate(
                Feature::Scene,
                &Inputs::new().with("premise", "a deal").with("location", "docks"),
            )
            .await;
        assert!(scene.is_ok());
        assert_eq!(backend.calls(), 1);

        drop(slot);
        assert!(!studio.is_busy(Feature::CharacterProfile));
    }

    #[tokio::test]
    async fn art_prompt_is_trimmed_text() {
        let (_backend, studio) =
            studio(ScriptedBackend::new().text("\n  Liquid mercury climbs her throat, neon in every bead.  \n"));
        let text = studio
            .art_prompt(
                &Inputs::new()
                    .with("transformation", "liquid mercury flowing over her skin")
                    .with("mood", "seductive and dangerous"),
            )
            .await
            .unwrap();
        assert!(!text.is_empty());
        assert_eq!(text, text.trim());
    }

    #[tokio::test]
    async fn image_with_no_images_is_an_error() {
        let (_backend, studio) = studio(ScriptedBackend::new().images(vec![]));
        let err = studio
            .image(&Inputs::new().with("prompt", "alley"))
            .await
            .unwrap_err();
        let StudioError::Communication { source, .. } = err else {
            panic!("expected communication error");
        };
        assert_eq!(source.kind, CommunicationKind::NoImages);
    }

    #[tokio::test]
    async fn guide_reply_appends_pair_and_replays_history() {
        let (backend, studio) = studio(
            ScriptedBackend::new()
                .text("The Akagawa clan runs the docks.")
                .text("Trust is a luxury."),
        );
        let mut transcript = Transcript::new();
        studio
            .guide_reply(&mut transcript, "Who runs the docks?")
            .await
            .unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[0].speaker, Speaker::User);
        assert_eq!(transcript.entries()[0].text, "Who runs the docks?");
        assert_eq!(transcript.entries()[1].speaker, Speaker::Ai);

        studio
            .guide_reply(&mut transcript, "Can I trust them?")
            .await
            .unwrap();
        let second = &backend.prompts()[1];
        assert!(second.contains("Who runs the docks?"));
        assert!(second.contains("The Akagawa clan runs the docks."));
        assert_eq!(transcript.len(), 4);
    }

    #[tokio::test]
    async fn failed_guide_turn_leaves_transcript_unchanged() {
        let (_backend, studio) =
            studio(ScriptedBackend::new().fail(ModelCommunicationError::transport("reset")));
        let mut transcript = Transcript::new();
        assert!(studio.guide_reply(&mut transcript, "hello").await.is_err());
        assert!(transcript.is_empty());

        let err = studio.guide_reply(&mut transcript, "   ").await.unwrap_err();
        assert!(matches!(err, StudioError::Validation { .. }));
    }

    #[tokio::test]
    async fn batch_failure_keeps_prefix() {
        let mut backend = ScriptedBackend::new();
        for _ in 0..2 {
            backend = backend.text(json(&test_support::location()));
        }
        backend = backend.text("not json at all");
        let (backend, studio) = studio(backend);

        let outcome = studio
            .run_batch(Feature::LocationBatch, &NoopObserver)
            .await
            .unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(backend.calls(), 3);
        let err = outcome.error().unwrap();
        assert!(err.user_message().contains("Harbor Ward Docks"));
        assert!(!studio.is_busy(Feature::LocationBatch));
    }

    #[tokio::test]
    async fn batch_rejects_non_batch_features() {
        let (_backend, studio) = studio(ScriptedBackend::new());
        let err = studio
            .run_batch(Feature::Glossary, &NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::UnsupportedMode { .. }));
    }

    #[test]
    fn prompt_matrix_makes_no_call() {
        let (backend, studio) = studio(ScriptedBackend::new());
        assert_eq!(studio.prompt_matrix().len(), 16);
        assert_eq!(backend.calls(), 0);
    }
}

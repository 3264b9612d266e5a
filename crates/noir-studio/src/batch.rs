//! Sequential generation over a fixed subject list.
//!
//! [`run_batch`] issues one structured call per subject, strictly in list
//! order, and never starts call *k+1* before call *k* has finished. The first
//! failure stops the run: results gathered so far are kept, the failure names
//! its subject, and later subjects are never requested. Every run starts at
//! the first subject.
//!
//! Progress is reported through a [`BatchObserver`]:
//!
//! | Observer | Use case |
//! |----------|----------|
//! | [`NoopObserver`] | Tests, fire-and-forget runs |
//! | [`LoggingObserver`] | Progress lines via `tracing` |
//! | [`FnObserver`] | Quick closures |
//! | [`CompositeObserver`] | Several observers in order |

use serde::Serialize;
use tracing::{info, warn};

use crate::completion::CompletionClient;
use crate::error::{ModelCommunicationError, StudioError};
use crate::prompt::{Inputs, compile};
use crate::roster::{CAST, DISTRICTS, scene_pairings};
use crate::schema::{Feature, ResultType, registry};

// ── Jobs ───────────────────────────────────────────────────────────

/// One subject of a batch and its compiled prompt.
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub subject: String,
    pub prompt: String,
}

/// The compiled job list for a batch feature, in list order.
pub fn jobs(feature: Feature) -> Option<Vec<BatchJob>> {
    let element = registry::element_feature(feature)?;
    let jobs = match feature {
        Feature::CharacterBatch => CAST
            .iter()
            .map(|c| BatchJob {
                subject: c.name.to_string(),
                prompt: compile(
                    element,
                    &Inputs::new().with("name", c.name).with("concept", c.brief),
                ),
            })
            .collect(),
        Feature::LocationBatch => DISTRICTS
            .iter()
            .map(|d| BatchJob {
                subject: d.name.to_string(),
                prompt: compile(
                    element,
                    &Inputs::new().with("name", d.name).with("vibe", d.brief),
                ),
            })
            .collect(),
        Feature::SceneMatrix => scene_pairings()
            .iter()
            .map(|p| {
                let inputs = Inputs::new()
                    .with(
                        "premise",
                        format!(
                            "{}, {}, walks into {} and the night goes wrong.",
                            p.character.name, p.character.brief, p.district.name
                        ),
                    )
                    .with("location", format!("{}: {}", p.district.name, p.district.brief))
                    .with("characters", p.character.name);
                BatchJob {
                    subject: p.label(),
                    prompt: compile(element, &inputs),
                }
            })
            .collect(),
        _ => return None,
    };
    Some(jobs)
}

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted during a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent<'a> {
    Started {
        feature: Feature,
        total: usize,
    },
    /// A subject finished; `completed` counts successes so far.
    Progress {
        feature: Feature,
        subject: &'a str,
        completed: usize,
        total: usize,
    },
    /// The run stopped at `subject` (0-based `index`).
    Failed {
        feature: Feature,
        subject: &'a str,
        index: usize,
        total: usize,
        error: String,
    },
    Finished {
        feature: Feature,
        total: usize,
    },
}

/// Observer for batch progress.
pub trait BatchObserver: Send + Sync {
    fn on_event(&self, event: &BatchEvent<'_>) {
        let _ = event;
    }
}

pub struct NoopObserver;
impl BatchObserver for NoopObserver {}

/// Logs every event through `tracing`.
pub struct LoggingObserver;

impl BatchObserver for LoggingObserver {
    fn on_event(&self, event: &BatchEvent<'_>) {
        match event {
            BatchEvent::Started { feature, total } => {
                info!("[{feature}] starting batch of {total}");
            }
            BatchEvent::Progress {
                feature,
                subject,
                completed,
                total,
            } => info!("[{feature}] {completed}/{total} done: {subject}"),
            BatchEvent::Failed {
                feature,
                subject,
                index,
                total,
                error,
            } => warn!(
                "[{feature}] stopped at {subject} ({}/{total}): {error}",
                index + 1
            ),
            BatchEvent::Finished { feature, total } => {
                info!("[{feature}] batch complete ({total}/{total})");
            }
        }
    }
}

/// Wraps a closure into a [`BatchObserver`].
pub struct FnObserver<F>(F)
where
    F: Fn(&BatchEvent<'_>) + Send + Sync;

impl<F> FnObserver<F>
where
    F: Fn(&BatchEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> BatchObserver for FnObserver<F>
where
    F: Fn(&BatchEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &BatchEvent<'_>) {
        (self.0)(event)
    }
}

/// Dispatches each event to every inner observer in registration order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Box<dyn BatchObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl BatchObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }
}

impl BatchObserver for CompositeObserver {
    fn on_event(&self, event: &BatchEvent<'_>) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

// ── Outcome ────────────────────────────────────────────────────────

/// Where a batch stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// 0-based position of the failed subject.
    pub index: usize,
    pub subject: String,
    pub error: ModelCommunicationError,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    pub feature: Feature,
    /// Results for subjects `0..results.len()`, in list order.
    pub results: Vec<T>,
    pub total: usize,
    pub failure: Option<BatchFailure>,
}

impl<T> BatchOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> BatchOutcome<U> {
        BatchOutcome {
            feature: self.feature,
            results: self.results.into_iter().map(f).collect(),
            total: self.total,
            failure: self.failure,
        }
    }

    /// The failure as a feature-scoped error, if the run stopped early.
    pub fn error(&self) -> Option<StudioError> {
        self.failure.as_ref().map(|f| StudioError::Batch {
            feature: self.feature,
            subject: f.subject.clone(),
            completed: self.results.len(),
            total: self.total,
            source: f.error.clone(),
        })
    }
}

// ── Runner ─────────────────────────────────────────────────────────

/// Run `jobs` one at a time, stopping at the first failure.
pub async fn run_batch<T: ResultType>(
    client: &CompletionClient,
    feature: Feature,
    jobs: &[BatchJob],
    observer: &dyn BatchObserver,
) -> BatchOutcome<T> {
    let total = jobs.len();
    observer.on_event(&BatchEvent::Started { feature, total });

    let mut results = Vec::with_capacity(total);
    for (index, job) in jobs.iter().enumerate() {
        match client.complete::<T>(&job.prompt).await {
            Ok(value) => {
                results.push(value);
                observer.on_event(&BatchEvent::Progress {
                    feature,
                    subject: &job.subject,
                    completed: results.len(),
                    total,
                });
            }
            Err(error) => {
                observer.on_event(&BatchEvent::Failed {
                    feature,
                    subject: &job.subject,
                    index,
                    total,
                    error: error.to_string(),
                });
                return BatchOutcome {
                    feature,
                    results,
                    total,
                    failure: Some(BatchFailure {
                        index,
                        subject: job.subject.clone(),
                        error,
                    }),
                };
            }
        }
    }

    observer.on_event(&BatchEvent::Finished { feature, total });
    BatchOutcome {
        feature,
        results,
        total,
        failure: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ScriptedBackend;
    use crate::schema::CharacterProfile;
    use std::sync::{Arc, Mutex};

    fn profile_json(name: &str) -> String {
        serde_json::json!({
            "name": name,
            "alias": "Ghost",
            "occupation": "detective",
            "appearance": "trench coat",
            "personality": "tired",
            "backstory": "fell from grace",
            "signature_quote": "Rain never washes anything clean.",
            "cybernetics": ["chrome arm", "night eyes"]
        })
        .to_string()
    }

    fn client_failing_at(k: usize) -> (Arc<ScriptedBackend>, CompletionClient) {
        let mut backend = ScriptedBackend::new();
        for (i, c) in CAST.iter().enumerate() {
            backend = if i + 1 == k {
                backend.fail(ModelCommunicationError::http(502, "bad gateway"))
            } else {
                backend.text(profile_json(c.name))
            };
        }
        let backend = Arc::new(backend);
        (Arc::clone(&backend), CompletionClient::new(backend))
    }

    #[test]
    fn jobs_follow_list_order() {
        let chars = jobs(Feature::CharacterBatch).unwrap();
        assert_eq!(chars.len(), 4);
        assert_eq!(chars[0].subject, "Rei Kisaragi");
        assert!(chars[0].prompt.contains("chrome left arm"));

        let scenes = jobs(Feature::SceneMatrix).unwrap();
        assert_eq!(scenes[1].subject, "Mika Tsukino @ Shinjuku Undercity");
        assert!(scenes[1].prompt.contains("Shinjuku Undercity"));

        assert!(jobs(Feature::CharacterProfile).is_none());
    }

    #[tokio::test]
    async fn full_run_returns_every_result_in_order() {
        let (backend, client) = client_failing_at(0);
        let list = jobs(Feature::CharacterBatch).unwrap();
        let outcome: BatchOutcome<CharacterProfile> =
            run_batch(&client, Feature::CharacterBatch, &list, &NoopObserver).await;
        assert!(outcome.is_complete());
        let names: Vec<&str> = outcome.results.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, CAST.map(|c| c.name));
        assert_eq!(backend.calls(), 4);
    }

    #[tokio::test]
    async fn failure_at_k_keeps_prefix_and_stops() {
        for k in 1..=CAST.len() {
            let (backend, client) = client_failing_at(k);
            let list = jobs(Feature::CharacterBatch).unwrap();
            let outcome: BatchOutcome<CharacterProfile> =
                run_batch(&client, Feature::CharacterBatch, &list, &NoopObserver).await;

            assert_eq!(outcome.results.len(), k - 1, "k={k}");
            assert_eq!(backend.calls(), k, "k={k}");
            let failure = outcome.failure.as_ref().unwrap();
            assert_eq!(failure.index, k - 1);
            assert_eq!(failure.subject, CAST[k - 1].name);

            let err = outcome.error().unwrap();
            assert!(err.user_message().contains(CAST[k - 1].name));
        }
    }

    #[tokio::test]
    async fn observer_sees_progress_then_failure() {
        let (_backend, client) = client_failing_at(3);
        let list = jobs(Feature::CharacterBatch).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = FnObserver::new(move |event| {
            let line = match event {
                BatchEvent::Started { total, .. } => format!("start {total}"),
                BatchEvent::Progress {
                    completed, total, ..
                } => format!("{completed}/{total}"),
                BatchEvent::Failed { subject, .. } => format!("fail {subject}"),
                BatchEvent::Finished { .. } => "done".to_string(),
            };
            sink.lock().unwrap().push(line);
        });
        let _: BatchOutcome<CharacterProfile> =
            run_batch(&client, Feature::CharacterBatch, &list, &observer).await;
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["start 4", "1/4", "2/4", "fail Jin Akagawa"]
        );
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = BatchEvent::Progress {
            feature: Feature::LocationBatch,
            subject: "Harbor Ward Docks",
            completed: 3,
            total: 4,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "progress");
        assert_eq!(json["feature"], "location-batch");
        assert_eq!(json["completed"], 3);
    }

    #[test]
    fn composite_dispatches_to_all() {
        let count = Arc::new(Mutex::new(0));
        let a = Arc::clone(&count);
        let b = Arc::clone(&count);
        let observer = CompositeObserver::new()
            .with(FnObserver::new(move |_| *a.lock().unwrap() += 1))
            .with(FnObserver::new(move |_| *b.lock().unwrap() += 1))
            .with(LoggingObserver);
        observer.on_event(&BatchEvent::Finished {
            feature: Feature::SceneMatrix,
            total: 4,
        });
        assert_eq!(*count.lock().unwrap(), 2);
    }
}

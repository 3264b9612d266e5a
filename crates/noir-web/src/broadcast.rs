//! [`BatchObserver`] that forwards batch progress to WebSocket clients.
//!
//! [`BroadcastObserver`] converts each [`BatchEvent`] into an owned
//! [`WsMessage`] and sends it on a `tokio::sync::broadcast` channel. Every
//! connected client gets every message.

use noir_studio::batch::{BatchEvent, BatchObserver};
use noir_studio::schema::Feature;
use serde::Serialize;
use tokio::sync::broadcast;

/// A message sent from the server to WebSocket clients.
///
/// Discriminated on the `type` field when serialized to JSON.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Features with a call outstanding. Sent on connect and after a lag.
    Snapshot { busy: Vec<Feature> },
    BatchStarted { feature: Feature, total: usize },
    /// One subject finished; `completed` counts successes so far.
    BatchProgress {
        feature: Feature,
        subject: String,
        completed: usize,
        total: usize,
    },
    /// The batch stopped at `subject` (0-based `index`).
    BatchFailed {
        feature: Feature,
        subject: String,
        index: usize,
        total: usize,
        error: String,
    },
    BatchFinished { feature: Feature, total: usize },
}

impl From<&BatchEvent<'_>> for WsMessage {
    fn from(event: &BatchEvent<'_>) -> Self {
        match event {
            BatchEvent::Started { feature, total } => WsMessage::BatchStarted {
                feature: *feature,
                total: *total,
            },
            BatchEvent::Progress {
                feature,
                subject,
                completed,
                total,
            } => WsMessage::BatchProgress {
                feature: *feature,
                subject: subject.to_string(),
                completed: *completed,
                total: *total,
            },
            BatchEvent::Failed {
                feature,
                subject,
                index,
                total,
                error,
            } => WsMessage::BatchFailed {
                feature: *feature,
                subject: subject.to_string(),
                index: *index,
                total: *total,
                error: error.clone(),
            },
            BatchEvent::Finished { feature, total } => WsMessage::BatchFinished {
                feature: *feature,
                total: *total,
            },
        }
    }
}

/// Batch observer that broadcasts progress to WebSocket clients.
///
/// Compose alongside [`LoggingObserver`](noir_studio::batch::LoggingObserver)
/// in a [`CompositeObserver`](noir_studio::batch::CompositeObserver):
///
/// ```ignore
/// let observer = CompositeObserver::new()
///     .with(LoggingObserver)
///     .with(BroadcastObserver::new(ws_sender.clone()));
/// ```
pub struct BroadcastObserver {
    sender: broadcast::Sender<WsMessage>,
}

impl BroadcastObserver {
    pub fn new(sender: broadcast::Sender<WsMessage>) -> Self {
        Self { sender }
    }
}

impl BatchObserver for BroadcastObserver {
    fn on_event(&self, event: &BatchEvent<'_>) {
        // No subscribers is fine.
        let _ = self.sender.send(WsMessage::from(event));
    }
}

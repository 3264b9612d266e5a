//! Conversation state for the city guide.
//!
//! The caller owns the [`Transcript`] and hands it to
//! [`Studio::guide_reply`](crate::studio::Studio::guide_reply), which appends
//! a user/guide pair only when the reply arrives. There is no length cap:
//! every prior turn is sent with each new message.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

impl Speaker {
    /// Label used when replaying the conversation to the model.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "Visitor",
            Speaker::Ai => "Kage",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
}

/// Ordered chat history, oldest first.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    /// Append one completed exchange: the user's message, then the reply.
    pub(crate) fn record_turn(&mut self, message: String, reply: String) {
        self.entries.push(ChatEntry {
            speaker: Speaker::User,
            text: message,
        });
        self.entries.push(ChatEntry {
            speaker: Speaker::Ai,
            text: reply,
        });
    }
}

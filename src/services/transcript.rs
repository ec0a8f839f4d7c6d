// src/services/transcript.rs
use std::{fmt::Debug, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Sender name reserved for generated replies.
pub const BOT_SENDER: &str = "Bot";

const TIME_FORMAT: &str = "%I:%M %p";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: String,
    pub time: String,
}

impl Message {
    /// Build a record stamped with the current local time.
    pub fn new(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
            time: chrono::Local::now().format(TIME_FORMAT).to_string(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, BOT_SENDER)
    }

    pub fn is_bot(&self) -> bool {
        self.sender == BOT_SENDER
    }
}

/// Append-only history shared by every request for the life of the process.
#[derive(Clone, Default)]
pub struct TranscriptStore {
    inner: Arc<RwLock<Vec<Message>>>,
}

impl Debug for TranscriptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptStore").finish_non_exhaustive()
    }
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a record to the end and return the new length.
    pub async fn append(&self, message: Message) -> usize {
        let mut guard = self.inner.write().await;
        guard.push(message);
        guard.len()
    }

    /// Snapshot of the whole transcript in insertion order.
    pub async fn all(&self) -> Vec<Message> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

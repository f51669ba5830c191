//! Transcript messages and the transient streaming buffer

use super::entities::ParticipantId;
use super::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// A debater's argument for the stage it was produced in
    Argument,
    /// The judge's verdict
    Verdict,
    /// Protocol announcements (stage changes, coin toss)
    System,
}

/// A committed transcript message (Entity)
///
/// Messages are append-only and ordered by creation; the backend's log
/// is the canonical transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub participant_id: ParticipantId,
    pub content: String,
    /// Model reasoning shown alongside the content, when present
    pub reasoning: Option<String>,
    pub stage: Stage,
    pub round: u32,
    pub message_type: MessageType,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A partially-built message visible only while a stream is open.
///
/// This is a preview, not the source of truth: it is discarded on
/// completion or error, and the committed [`Message`] is obtained by
/// reloading session state from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingMessage {
    pub participant_id: ParticipantId,
    pub stage: Stage,
    pub content: String,
    pub reasoning: String,
}

impl StreamingMessage {
    pub fn new(participant_id: ParticipantId, stage: Stage) -> Self {
        Self {
            participant_id,
            stage,
            content: String::new(),
            reasoning: String::new(),
        }
    }

    pub fn append_content(&mut self, chunk: &str) {
        self.content.push_str(chunk);
    }

    pub fn append_reasoning(&mut self, chunk: &str) {
        self.reasoning.push_str(chunk);
    }
}

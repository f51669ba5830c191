//! Streaming events for a speaker's turn.
//!
//! A turn arrives as a line-oriented event stream; each line is a JSON
//! object keyed by a `type` discriminator. [`parse_event_line`] turns one
//! line into a [`StreamEvent`], decoding the base64 audio payload at
//! parse time so that a bad payload surfaces as a parse error (which the
//! reader logs and skips) rather than reaching the audio pipeline.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use thiserror::Error;

/// An event in a streaming turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Textual content to append to the transient message.
    Token(String),
    /// Reasoning content to append to the transient message.
    Thinking(String),
    /// A decoded synthesized-speech payload, handed to the audio
    /// sequencer immediately.
    AudioChunk(Vec<u8>),
    /// Successful completion; the committed message becomes visible on
    /// the next session reload.
    Done,
    /// Failure reported by the backend mid-stream.
    Error(String),
}

impl StreamEvent {
    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error(_))
    }
}

/// Error parsing a single stream line.
///
/// Malformed lines are skipped by the reader; they never abort the
/// stream.
#[derive(Error, Debug)]
pub enum StreamParseError {
    #[error("Invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base64 audio payload: {0}")]
    Audio(#[from] base64::DecodeError),
}

/// Wire shape of one event line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Token { content: String },
    Thinking { content: String },
    AudioChunk { data: String },
    Done,
    Error { message: String },
}

/// Parse one line of the event framing.
///
/// Pure function called once per line by the stream reader.
pub fn parse_event_line(line: &str) -> Result<StreamEvent, StreamParseError> {
    let wire: WireEvent = serde_json::from_str(line)?;
    let event = match wire {
        WireEvent::Token { content } => StreamEvent::Token(content),
        WireEvent::Thinking { content } => StreamEvent::Thinking(content),
        WireEvent::AudioChunk { data } => StreamEvent::AudioChunk(BASE64.decode(data)?),
        WireEvent::Done => StreamEvent::Done,
        WireEvent::Error { message } => StreamEvent::Error(message),
    };
    Ok(event)
}

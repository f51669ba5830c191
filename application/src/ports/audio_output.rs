//! Audio output port
//!
//! The sequencer plays payloads through this interface; the rodio
//! adapter lives in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from decoding or playing an audio payload
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("No output device: {0}")]
    Device(String),
}

/// A playback device for synthesized speech.
///
/// At most one payload is ever being played at a time; the sequencer
/// guarantees it never calls `play_to_end` concurrently with itself.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Decode and play one payload, returning once playback finished.
    async fn play_to_end(&self, payload: &[u8]) -> Result<(), AudioError>;

    /// Halt any in-progress playback immediately.
    fn stop(&self);
}

/// No-op output for headless runs and tests.
pub struct NullAudioOutput;

#[async_trait]
impl AudioOutput for NullAudioOutput {
    async fn play_to_end(&self, _payload: &[u8]) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&self) {}
}

//! Rodio adapter for the [`AudioOutput`] port.
//!
//! `rodio::OutputStream` is not `Send`, so a dedicated thread creates
//! it and keeps it alive for the adapter's lifetime; the `Sink` it
//! hands back is the single playing handle, shared with the async side.
//! The sequencer serializes calls, so the sink holds at most one source
//! at a time.

use async_trait::async_trait;
use podium_application::{AudioError, AudioOutput};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

/// Plays payloads on the default output device.
pub struct RodioAudioOutput {
    sink: Arc<Sink>,
}

impl RodioAudioOutput {
    /// Open the default output device.
    ///
    /// Fails when no device is available (headless hosts); callers fall
    /// back to the null output in that case.
    pub fn new() -> Result<Self, AudioError> {
        let (tx, rx) = std::sync::mpsc::channel::<Result<Arc<Sink>, AudioError>>();

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || {
                let (stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = tx.send(Err(AudioError::Device(e.to_string())));
                        return;
                    }
                };
                let sink = match Sink::try_new(&handle) {
                    Ok(sink) => Arc::new(sink),
                    Err(e) => {
                        let _ = tx.send(Err(AudioError::Device(e.to_string())));
                        return;
                    }
                };
                let _ = tx.send(Ok(Arc::clone(&sink)));

                // The OutputStream must outlive all playback; park here
                // holding it until the process ends.
                let _stream = stream;
                loop {
                    std::thread::park();
                }
            })
            .map_err(|e| AudioError::Device(e.to_string()))?;

        let sink = rx
            .recv()
            .map_err(|_| AudioError::Device("audio thread exited".to_string()))??;
        info!("Audio output ready");
        Ok(Self { sink })
    }
}

#[async_trait]
impl AudioOutput for RodioAudioOutput {
    async fn play_to_end(&self, payload: &[u8]) -> Result<(), AudioError> {
        if payload.is_empty() {
            return Ok(());
        }
        let cursor = Cursor::new(payload.to_vec());
        let source = Decoder::new(cursor).map_err(|e| AudioError::Decode(e.to_string()))?;
        self.sink.append(source.convert_samples::<f32>());

        // sleep_until_end blocks; keep it off the async workers.
        let sink = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || sink.sleep_until_end())
            .await
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        Ok(())
    }

    fn stop(&self) {
        self.sink.stop();
    }
}

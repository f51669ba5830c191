//! Strict-FIFO audio playback sequencer.
//!
//! Synthesized-speech chunks arrive on the text stream's schedule, but
//! must play strictly in enqueue order. The sequencer is a single
//! worker task owning a local queue: if nothing is playing, a payload
//! starts immediately; otherwise it waits its turn. Playback failures
//! drop the payload and advance — a broken chunk must not stall the
//! debate.
//!
//! Exactly one payload is ever being played; the worker is the only
//! caller of [`AudioOutput::play_to_end`] and awaits each call before
//! starting the next.

use crate::ports::audio_output::AudioOutput;
use std::collections::VecDeque;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, warn};

enum Command {
    Enqueue(Vec<u8>),
    StopAll,
}

/// FIFO queue plus a single active player.
///
/// Dropping the sequencer closes the command channel; the worker stops
/// playback and exits.
pub struct AudioSequencer {
    tx: mpsc::UnboundedSender<Command>,
    playing: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
}

impl AudioSequencer {
    /// Spawn the worker task over the given output device.
    pub fn new(output: Arc<dyn AudioOutput>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let playing = Arc::new(AtomicBool::new(false));
        let queued = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_worker(
            output,
            rx,
            Arc::clone(&playing),
            Arc::clone(&queued),
        ));

        Self {
            tx,
            playing,
            queued,
        }
    }

    /// Queue a payload for playback after everything enqueued before it.
    pub fn enqueue(&self, payload: Vec<u8>) {
        // Send fails only if the worker is gone (sequencer dropped).
        let _ = self.tx.send(Command::Enqueue(payload));
    }

    /// Halt current playback, clear the queue, and return to idle.
    pub fn stop_all(&self) {
        let _ = self.tx.send(Command::StopAll);
    }

    /// Whether nothing is playing and nothing is queued.
    ///
    /// Observed state lags commands still in the channel; callers that
    /// need quiescence should yield to the runtime first.
    pub fn is_idle(&self) -> bool {
        !self.playing.load(Ordering::SeqCst) && self.queued.load(Ordering::SeqCst) == 0
    }
}

async fn run_worker(
    output: Arc<dyn AudioOutput>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    playing: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
) {
    let mut queue: VecDeque<Vec<u8>> = VecDeque::new();

    loop {
        let payload = match queue.pop_front() {
            Some(p) => p,
            // Idle: block for the next command.
            None => match rx.recv().await {
                Some(Command::Enqueue(p)) => p,
                Some(Command::StopAll) => continue,
                None => break,
            },
        };
        queued.store(queue.len(), Ordering::SeqCst);
        playing.store(true, Ordering::SeqCst);

        let mut interrupted = false;
        {
            let mut play = pin!(output.play_to_end(&payload));
            loop {
                tokio::select! {
                    result = &mut play => {
                        if let Err(e) = result {
                            // Drop the payload and advance; see module docs.
                            warn!("Audio playback failed, skipping chunk: {}", e);
                        }
                        break;
                    }
                    cmd = rx.recv() => match cmd {
                        Some(Command::Enqueue(p)) => {
                            queue.push_back(p);
                            queued.store(queue.len(), Ordering::SeqCst);
                        }
                        Some(Command::StopAll) => {
                            output.stop();
                            queue.clear();
                            queued.store(0, Ordering::SeqCst);
                            debug!("Audio sequencer stopped and cleared");
                            interrupted = true;
                            break;
                        }
                        None => {
                            output.stop();
                            playing.store(false, Ordering::SeqCst);
                            queued.store(0, Ordering::SeqCst);
                            return;
                        }
                    }
                }
            }
        }

        playing.store(false, Ordering::SeqCst);
        if interrupted {
            continue;
        }
    }

    playing.store(false, Ordering::SeqCst);
    queued.store(0, Ordering::SeqCst);
}

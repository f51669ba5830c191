//! Stream coordinator: one cancellable streaming read per floor-holder.
//!
//! Opens the backend's event stream for a speaking participant, feeds
//! partial output into the session store, and hands audio chunks to the
//! sequencer as they arrive. Owns the cancellation-token registry: at
//! most one entry is live in normal operation, and starting a new
//! stream first cancels every other entry.
//!
//! Cancellation is distinguished from transport failure. A cancelled
//! turn clears state quietly; any other termination without a `done`
//! event is an incomplete turn and commits nothing.

use crate::audio::sequencer::AudioSequencer;
use crate::ports::backend::{DebateBackend, StreamHandle};
use crate::ports::observer::SessionObserver;
use crate::store::session_store::SessionStore;
use crate::use_cases::orchestrator::OrchestratorError;
use podium_domain::{Participant, ParticipantId, SessionId, Stage, StreamEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a streamed turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stream reported `done`; the transcript was reloaded.
    Committed,
    /// The turn was cancelled; state was cleared quietly.
    Cancelled,
}

/// Coordinates streaming turns and the cancellation registry.
pub struct StreamCoordinator<B: DebateBackend + 'static> {
    backend: Arc<B>,
    store: Arc<Mutex<SessionStore>>,
    sequencer: Arc<AudioSequencer>,
    registry: Mutex<HashMap<ParticipantId, CancellationToken>>,
}

impl<B: DebateBackend + 'static> StreamCoordinator<B> {
    pub fn new(
        backend: Arc<B>,
        store: Arc<Mutex<SessionStore>>,
        sequencer: Arc<AudioSequencer>,
    ) -> Self {
        Self {
            backend,
            store,
            sequencer,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live registry entries (at most one in normal operation).
    pub fn active_streams(&self) -> usize {
        self.registry.lock().unwrap().len()
    }

    /// Cancel the given participant's in-flight turn, if any.
    ///
    /// Not an error path: the read loop notices the token and clears
    /// state quietly.
    pub fn cancel_turn(&self, participant_id: &ParticipantId) {
        if let Some(token) = self.registry.lock().unwrap().get(participant_id) {
            token.cancel();
        }
        self.sequencer.stop_all();
    }

    /// Cancel every registry entry, clear the floor-holder, stop and
    /// clear the audio sequencer, and drop the transient message.
    ///
    /// One call produces all four effects before returning; used on
    /// session switch and teardown.
    pub fn abort_all_streams(&self) {
        let mut registry = self.registry.lock().unwrap();
        for token in registry.values() {
            token.cancel();
        }
        registry.clear();
        drop(registry);

        self.sequencer.stop_all();
        self.store.lock().unwrap().discard_streaming();
    }

    /// Run one participant's streamed turn to completion.
    ///
    /// Returns [`TurnOutcome::Committed`] once `done` arrived and the
    /// session was reloaded, [`TurnOutcome::Cancelled`] on cooperative
    /// cancellation, and an error for anything that ended the stream
    /// without committing.
    pub async fn stream_turn(
        &self,
        session_id: &SessionId,
        participant: &Participant,
        stage: Stage,
        language: &str,
        observer: &dyn SessionObserver,
    ) -> Result<TurnOutcome, OrchestratorError> {
        let token = self.register(&participant.id);
        self.store
            .lock()
            .unwrap()
            .begin_streaming(participant.id.clone(), stage);

        info!(
            "Streaming turn: participant={} stage={}",
            participant.id, stage
        );

        let handle = match self
            .backend
            .stream_participant(session_id, &participant.id, stage, language)
            .await
        {
            Ok(h) => h,
            Err(e) => {
                self.finish(&participant.id);
                return Err(e.into());
            }
        };

        let result = self
            .consume(session_id, participant, handle, &token, observer)
            .await;
        self.finish(&participant.id);
        result
    }

    /// Insert a fresh token for the participant, cancelling and clearing
    /// any other entry first (only one floor-holder).
    ///
    /// The superseded turn's audio is stopped here, synchronously,
    /// before the new turn can enqueue anything.
    fn register(&self, participant_id: &ParticipantId) -> CancellationToken {
        let mut registry = self.registry.lock().unwrap();
        let superseded = !registry.is_empty();
        for (other, token) in registry.drain() {
            debug!("Cancelling previous stream for {}", other);
            token.cancel();
        }
        let token = CancellationToken::new();
        registry.insert(participant_id.clone(), token.clone());
        drop(registry);

        if superseded {
            self.sequencer.stop_all();
        }
        token
    }

    /// Remove the participant's registry entry and drop any leftover
    /// transient state, provided the participant still holds the floor.
    fn finish(&self, participant_id: &ParticipantId) {
        self.registry.lock().unwrap().remove(participant_id);
        self.store
            .lock()
            .unwrap()
            .discard_streaming_for(participant_id);
    }

    async fn consume(
        &self,
        session_id: &SessionId,
        participant: &Participant,
        mut handle: StreamHandle,
        token: &CancellationToken,
        observer: &dyn SessionObserver,
    ) -> Result<TurnOutcome, OrchestratorError> {
        loop {
            let event = tokio::select! {
                _ = token.cancelled() => {
                    // Audio teardown happens at the cancellation source
                    // (cancel_turn, abort_all_streams, register), not
                    // here: this branch runs whenever the cancelled task
                    // is next polled, which may be after a superseding
                    // turn has already started enqueuing its own chunks.
                    handle.abort();
                    info!("Turn cancelled: participant={}", participant.id);
                    return Ok(TurnOutcome::Cancelled);
                }
                event = handle.receiver.recv() => event,
            };

            match event {
                Some(StreamEvent::Token(chunk)) => {
                    self.store.lock().unwrap().append_token(&chunk);
                    observer.on_token(&chunk);
                }
                Some(StreamEvent::Thinking(chunk)) => {
                    self.store.lock().unwrap().append_thinking(&chunk);
                    observer.on_thinking(&chunk);
                }
                Some(StreamEvent::AudioChunk(payload)) => {
                    // Handed off immediately; the sequencer owns ordering.
                    self.sequencer.enqueue(payload);
                }
                Some(StreamEvent::Done) => {
                    // The local buffer is a preview. The committed
                    // message comes from reloading the backend's state.
                    let snapshot = self.backend.load_session(session_id).await?;
                    self.store.lock().unwrap().replace(snapshot);
                    observer.on_turn_committed(participant);
                    info!("Turn committed: participant={}", participant.id);
                    return Ok(TurnOutcome::Committed);
                }
                Some(StreamEvent::Error(message)) => {
                    warn!("Stream reported error: {}", message);
                    return Err(OrchestratorError::TurnFailed(message));
                }
                // Transport ended without a `done` event: incomplete
                // turn, nothing is committed.
                None => return Err(OrchestratorError::IncompleteTurn),
            }
        }
    }
}

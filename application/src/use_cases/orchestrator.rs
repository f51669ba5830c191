//! Debate orchestrator.
//!
//! Drives a session through the stage protocol: asks the backend's
//! scheduler what happens next, then executes exactly the returned
//! action — stream a participant's turn, advance the stage, or stop.
//! Every persisted-state change is observed through a full reload; the
//! orchestrator never locally synthesizes a transcript entry.

use crate::audio::sequencer::AudioSequencer;
use crate::ports::backend::{BackendError, DebateBackend, RoleAssignment};
use crate::ports::observer::{NoObserver, SessionObserver};
use crate::ports::resume_cache::ResumeCache;
use crate::store::session_store::SessionStore;
use crate::use_cases::shared::check_cancelled;
use crate::use_cases::stream_turn::{StreamCoordinator, TurnOutcome};
use podium_domain::{
    Message, NextAction, Participant, ParticipantId, SessionId, Stage, StreamingMessage,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while orchestrating a debate
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("No active session")]
    NoSession,

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Stream ended without completing the turn")]
    IncompleteTurn,

    #[error("Turn failed: {0}")]
    TurnFailed(String),

    #[error("Operation cancelled")]
    Cancelled,
}

/// What one scheduling step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A participant's turn streamed and committed.
    Spoke(ParticipantId),
    /// The session advanced to the given stage.
    Advanced(Stage),
    /// The in-flight turn was cancelled.
    Cancelled,
    /// The debate is over.
    Complete,
}

/// Use case for running a debate session end to end.
pub struct DebateOrchestrator<B: DebateBackend + 'static> {
    backend: Arc<B>,
    store: Arc<Mutex<SessionStore>>,
    coordinator: StreamCoordinator<B>,
    observer: Arc<dyn SessionObserver>,
    resume_cache: Option<Arc<dyn ResumeCache>>,
    cancellation_token: Option<CancellationToken>,
    language: String,
}

impl<B: DebateBackend + 'static> DebateOrchestrator<B> {
    pub fn new(backend: Arc<B>, sequencer: Arc<AudioSequencer>) -> Self {
        let store = Arc::new(Mutex::new(SessionStore::new()));
        let coordinator =
            StreamCoordinator::new(Arc::clone(&backend), Arc::clone(&store), sequencer);
        Self {
            backend,
            store,
            coordinator,
            observer: Arc::new(NoObserver),
            resume_cache: None,
            cancellation_token: None,
            language: "en".to_string(),
        }
    }

    /// Set an observer for debate progress
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the language passed with every streaming request
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set a cancellation token for graceful interruption of the run loop
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Record sessions in an advisory resume cache
    pub fn with_resume_cache(mut self, cache: Arc<dyn ResumeCache>) -> Self {
        self.resume_cache = Some(cache);
        self
    }

    // ==================== Session lifecycle ====================

    /// Create a session on the backend, then load it.
    pub async fn create_session(
        &self,
        topic: &str,
        assignments: &[RoleAssignment],
    ) -> Result<SessionId, OrchestratorError> {
        let id = self.backend.create_session(topic, assignments).await?;
        info!("Created session {} for topic {:?}", id, topic);
        self.load_session(&id).await?;
        Ok(id)
    }

    /// Load (or switch to) a session, replacing all local state.
    pub async fn load_session(&self, id: &SessionId) -> Result<(), OrchestratorError> {
        // Switching sessions tears down any in-flight turn first.
        self.coordinator.abort_all_streams();

        let snapshot = self.backend.load_session(id).await?;
        let topic = snapshot.session.topic.clone();
        self.store.lock().unwrap().replace(snapshot);

        if let Some(cache) = &self.resume_cache {
            cache.record_recent(id, &topic);
            cache.point_current(id);
        }
        Ok(())
    }

    /// Reload the current session from the backend.
    pub async fn reload(&self) -> Result<(), OrchestratorError> {
        let id = self.session_id()?;
        let snapshot = self.backend.load_session(&id).await?;
        self.store.lock().unwrap().replace(snapshot);
        Ok(())
    }

    // ==================== Debate operations ====================

    /// Resolve the coin toss, then reload to observe the result.
    pub async fn coin_toss(&self) -> Result<(), OrchestratorError> {
        let id = self.session_id()?;
        let result = self.backend.coin_toss(&id).await?;
        info!("Coin toss: {:?} speaks first", result.first_side);
        self.reload().await
    }

    /// Record a stage transition, then reload.
    pub async fn advance_stage(&self, next: Stage) -> Result<(), OrchestratorError> {
        let id = self.session_id()?;
        self.backend.advance_stage(&id, next).await?;
        self.reload().await?;
        self.observer.on_stage_changed(next);
        Ok(())
    }

    /// Post a human participant's turn, then reload.
    pub async fn post_message(
        &self,
        participant_id: &ParticipantId,
        content: &str,
    ) -> Result<(), OrchestratorError> {
        let id = self.session_id()?;
        self.backend.post_message(&id, participant_id, content).await?;
        self.reload().await
    }

    /// Ask the scheduler what happens next and execute exactly that.
    ///
    /// A failed query propagates untouched; no fallback action is
    /// guessed.
    pub async fn step(&self) -> Result<StepOutcome, OrchestratorError> {
        check_cancelled(&self.cancellation_token)?;
        let id = self.session_id()?;

        match self.backend.decide_next(&id).await? {
            NextAction::Speak {
                participant_id,
                stage,
            } => {
                let participant = self
                    .store
                    .lock()
                    .unwrap()
                    .participant(&participant_id)
                    .cloned()
                    .ok_or_else(|| {
                        OrchestratorError::UnknownParticipant(participant_id.to_string())
                    })?;
                self.observer.on_turn_start(&participant, stage);

                let outcome = self
                    .coordinator
                    .stream_turn(&id, &participant, stage, &self.language, &*self.observer)
                    .await?;
                match outcome {
                    TurnOutcome::Committed => Ok(StepOutcome::Spoke(participant.id)),
                    TurnOutcome::Cancelled => Ok(StepOutcome::Cancelled),
                }
            }
            NextAction::AdvanceStage { next } => {
                debug!("Scheduler advanced stage to {}", next);
                self.advance_stage(next).await?;
                Ok(StepOutcome::Advanced(next))
            }
            NextAction::Complete => {
                info!("Debate complete");
                self.observer.on_debate_complete();
                Ok(StepOutcome::Complete)
            }
        }
    }

    /// Step until the debate completes or the turn is cancelled.
    pub async fn run(&self) -> Result<(), OrchestratorError> {
        loop {
            match self.step().await? {
                StepOutcome::Complete => return Ok(()),
                StepOutcome::Cancelled => {
                    warn!("Run loop stopped by cancellation");
                    return Ok(());
                }
                StepOutcome::Spoke(_) | StepOutcome::Advanced(_) => {}
            }
        }
    }

    // ==================== Cancellation & teardown ====================

    /// Cancel a specific participant's in-flight turn.
    pub fn cancel_turn(&self, participant_id: &ParticipantId) {
        self.coordinator.cancel_turn(participant_id);
    }

    /// Cancel every stream, stop audio, and drop transient state.
    pub fn abort_all_streams(&self) {
        self.coordinator.abort_all_streams();
    }

    // ==================== Read accessors ====================

    fn session_id(&self) -> Result<SessionId, OrchestratorError> {
        self.store
            .lock()
            .unwrap()
            .session()
            .map(|s| s.id.clone())
            .ok_or(OrchestratorError::NoSession)
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.store.lock().unwrap().current_stage()
    }

    pub fn session(&self) -> Option<podium_domain::DebateSession> {
        self.store.lock().unwrap().session().cloned()
    }

    pub fn topic(&self) -> Option<String> {
        self.store
            .lock()
            .unwrap()
            .session()
            .map(|s| s.topic.clone())
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.store.lock().unwrap().participants().to_vec()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.store.lock().unwrap().messages().to_vec()
    }

    pub fn floor_holder(&self) -> Option<ParticipantId> {
        self.store.lock().unwrap().floor_holder().cloned()
    }

    /// The in-flight turn's preview buffer, if a stream is open.
    pub fn streaming_preview(&self) -> Option<StreamingMessage> {
        self.store.lock().unwrap().streaming().cloned()
    }

    /// Number of live stream registry entries (test/diagnostic hook).
    pub fn active_streams(&self) -> usize {
        self.coordinator.active_streams()
    }
}

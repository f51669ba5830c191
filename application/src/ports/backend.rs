//! Debate backend port
//!
//! Defines the interface to the service that owns the session's source
//! of truth: session CRUD, the coin toss, stage advancement, the turn
//! scheduler query, and per-participant streaming.

use async_trait::async_trait;
use podium_domain::{
    CoinTossResult, DebateSession, Message, NextAction, Participant, ParticipantId, Role,
    SessionId, Stage, StreamEvent,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Errors that can occur during backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Stream transport error: {0}")]
    StreamTransport(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// A role assignment used at session creation
#[derive(Debug, Clone)]
pub struct RoleAssignment {
    pub role: Role,
    pub display_name: String,
    /// Model identifier for an AI participant; `None` for a human
    pub model: Option<String>,
}

impl RoleAssignment {
    pub fn ai(role: Role, display_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            role,
            display_name: display_name.into(),
            model: Some(model.into()),
        }
    }

    pub fn human(role: Role, display_name: impl Into<String>) -> Self {
        Self {
            role,
            display_name: display_name.into(),
            model: None,
        }
    }
}

/// Everything the backend knows about one session
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: DebateSession,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
}

/// Handle for consuming a participant's streamed turn.
///
/// Wraps the event receiver plus the reader task, so the coordinator can
/// abort the transport read when the turn is cancelled.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
    pub reader: JoinHandle<()>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>, reader: JoinHandle<()>) -> Self {
        Self { receiver, reader }
    }

    /// Stop the transport read. Safe to call after the reader finished.
    pub fn abort(&self) {
        self.reader.abort();
    }
}

/// Gateway to the debate backend
///
/// All session state mutations happen on the other side of this port;
/// the orchestrator observes them by reloading.
#[async_trait]
pub trait DebateBackend: Send + Sync {
    /// Create a session and return its id. Does not load it.
    async fn create_session(
        &self,
        topic: &str,
        assignments: &[RoleAssignment],
    ) -> Result<SessionId, BackendError>;

    /// Load the full session snapshot. The message order returned here
    /// is the canonical transcript order.
    async fn load_session(&self, id: &SessionId) -> Result<SessionSnapshot, BackendError>;

    /// Resolve the coin toss for a session.
    async fn coin_toss(&self, id: &SessionId) -> Result<CoinTossResult, BackendError>;

    /// Record a stage transition.
    async fn advance_stage(&self, id: &SessionId, next: Stage) -> Result<(), BackendError>;

    /// Post a human participant's turn.
    async fn post_message(
        &self,
        id: &SessionId,
        participant_id: &ParticipantId,
        content: &str,
    ) -> Result<(), BackendError>;

    /// Ask what happens next. This is a query, not a mutation: calling
    /// it repeatedly without acting on the result is safe.
    async fn decide_next(&self, id: &SessionId) -> Result<NextAction, BackendError>;

    /// Open a streaming read of a participant's turn.
    async fn stream_participant(
        &self,
        id: &SessionId,
        participant_id: &ParticipantId,
        stage: Stage,
        language: &str,
    ) -> Result<StreamHandle, BackendError>;
}

//! Test doubles shared by the use-case tests.

use crate::ports::backend::{
    BackendError, DebateBackend, RoleAssignment, SessionSnapshot, StreamHandle,
};
use async_trait::async_trait;
use chrono::Utc;
use podium_domain::{
    CoinTossResult, DebateSession, NextAction, Participant, ParticipantId, Role, SessionId,
    SessionStatus, Side, Stage, StreamEvent,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// A session in `setup` with one AI debater per side and a judge.
pub(crate) fn base_snapshot() -> SessionSnapshot {
    SessionSnapshot {
        session: DebateSession {
            id: SessionId::from("s-1"),
            topic: "AI in Education".to_string(),
            current_stage: Stage::Setup,
            status: SessionStatus::Active,
            coin_toss: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        participants: vec![
            aff_participant(),
            Participant::human("p-neg", "Neg Lead", Role::Negative1),
            Participant::ai("p-judge", "Judge", Role::Judge, "gpt-4o"),
        ],
        messages: vec![],
    }
}

pub(crate) fn aff_participant() -> Participant {
    Participant::ai("p-aff", "Aff Lead", Role::Affirmative1, "gpt-4o")
}

/// Script for one `stream_participant` call.
pub(crate) enum StreamScript {
    /// Send these events, then close the channel.
    Events(Vec<StreamEvent>),
    /// Send nothing and never close; ends only when aborted.
    HeldOpen,
}

impl StreamScript {
    pub(crate) fn events(events: Vec<StreamEvent>) -> Self {
        StreamScript::Events(events)
    }

    pub(crate) fn held_open() -> Self {
        StreamScript::HeldOpen
    }
}

/// Scriptable in-memory backend.
pub(crate) struct MockBackend {
    snapshot: Mutex<Option<SessionSnapshot>>,
    actions: Mutex<VecDeque<NextAction>>,
    streams: Mutex<VecDeque<StreamScript>>,
    decide_failure: Mutex<Option<String>>,
    advanced: Mutex<Vec<Stage>>,
    posted: Mutex<Vec<(ParticipantId, String)>>,
    loads: AtomicUsize,
    streams_opened: AtomicUsize,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            snapshot: Mutex::new(None),
            actions: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
            decide_failure: Mutex::new(None),
            advanced: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
            loads: AtomicUsize::new(0),
            streams_opened: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_snapshot(&self, snapshot: SessionSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
    }

    pub(crate) fn push_action(&self, action: NextAction) {
        self.actions.lock().unwrap().push_back(action);
    }

    pub(crate) fn push_stream(&self, script: StreamScript) {
        self.streams.lock().unwrap().push_back(script);
    }

    pub(crate) fn fail_next_decide(&self, message: &str) {
        *self.decide_failure.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn stream_count(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
    }

    pub(crate) fn advanced_stages(&self) -> Vec<Stage> {
        self.advanced.lock().unwrap().clone()
    }

    pub(crate) fn posted_messages(&self) -> Vec<(ParticipantId, String)> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DebateBackend for MockBackend {
    async fn create_session(
        &self,
        topic: &str,
        assignments: &[RoleAssignment],
    ) -> Result<SessionId, BackendError> {
        let id = SessionId::from("s-1");
        let participants = assignments
            .iter()
            .enumerate()
            .map(|(i, a)| match &a.model {
                Some(model) => {
                    Participant::ai(format!("p-{}", i), a.display_name.clone(), a.role, model)
                }
                None => Participant::human(format!("p-{}", i), a.display_name.clone(), a.role),
            })
            .collect();
        self.set_snapshot(SessionSnapshot {
            session: DebateSession {
                id: id.clone(),
                topic: topic.to_string(),
                current_stage: Stage::Setup,
                status: SessionStatus::Active,
                coin_toss: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            participants,
            messages: vec![],
        });
        Ok(id)
    }

    async fn load_session(&self, id: &SessionId) -> Result<SessionSnapshot, BackendError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| BackendError::SessionNotFound(id.to_string()))
    }

    async fn coin_toss(&self, _id: &SessionId) -> Result<CoinTossResult, BackendError> {
        let result = CoinTossResult {
            first_side: Side::Affirmative,
        };
        if let Some(snapshot) = self.snapshot.lock().unwrap().as_mut() {
            snapshot.session.coin_toss = Some(result.clone());
        }
        Ok(result)
    }

    async fn advance_stage(&self, _id: &SessionId, next: Stage) -> Result<(), BackendError> {
        self.advanced.lock().unwrap().push(next);
        if let Some(snapshot) = self.snapshot.lock().unwrap().as_mut() {
            snapshot.session.advance_to(next);
        }
        Ok(())
    }

    async fn post_message(
        &self,
        _id: &SessionId,
        participant_id: &ParticipantId,
        content: &str,
    ) -> Result<(), BackendError> {
        self.posted
            .lock()
            .unwrap()
            .push((participant_id.clone(), content.to_string()));
        Ok(())
    }

    async fn decide_next(&self, _id: &SessionId) -> Result<NextAction, BackendError> {
        if let Some(message) = self.decide_failure.lock().unwrap().take() {
            return Err(BackendError::RequestFailed(message));
        }
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::Other("no scripted action".to_string()))
    }

    async fn stream_participant(
        &self,
        _id: &SessionId,
        _participant_id: &ParticipantId,
        _stage: Stage,
        _language: &str,
    ) -> Result<StreamHandle, BackendError> {
        self.streams_opened.fetch_add(1, Ordering::SeqCst);
        let script = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::Other("no scripted stream".to_string()))?;

        let (tx, rx) = mpsc::channel(16);
        let reader = tokio::spawn(async move {
            match script {
                StreamScript::Events(events) => {
                    for event in events {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    // Dropping tx closes the channel.
                }
                StreamScript::HeldOpen => {
                    // Keep the sender alive until this task is aborted.
                    let _tx = tx;
                    std::future::pending::<()>().await;
                }
            }
        });
        Ok(StreamHandle::new(rx, reader))
    }
}

//! In-memory representation of one active debate.
//!
//! Owned exclusively by the orchestrator and mutated only through its
//! actions. Every change to the stage or the transcript originates from
//! a backend load — [`SessionStore::replace`] is the single write path
//! for persisted state, which keeps transcript ordering authoritative
//! to the backend. The transient streaming message and the floor holder
//! are the only locally-synthesized state.

use crate::ports::backend::SessionSnapshot;
use podium_domain::{
    DebateSession, Message, Participant, ParticipantId, Role, Side, Stage, StreamingMessage,
};

/// Session metadata, roster, transcript, and in-flight turn state.
#[derive(Debug, Default)]
pub struct SessionStore {
    snapshot: Option<SessionSnapshot>,
    streaming: Option<StreamingMessage>,
    floor_holder: Option<ParticipantId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all persisted state from a backend load.
    ///
    /// Leaves the transient message and floor holder alone; those track
    /// the in-flight turn, not persisted state.
    pub fn replace(&mut self, snapshot: SessionSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Forget everything, including in-flight turn state.
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.streaming = None;
        self.floor_holder = None;
    }

    pub fn session(&self) -> Option<&DebateSession> {
        self.snapshot.as_ref().map(|s| &s.session)
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.session().map(|s| s.current_stage)
    }

    pub fn participants(&self) -> &[Participant] {
        self.snapshot
            .as_ref()
            .map(|s| s.participants.as_slice())
            .unwrap_or(&[])
    }

    pub fn messages(&self) -> &[Message] {
        self.snapshot
            .as_ref()
            .map(|s| s.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants().iter().find(|p| &p.id == id)
    }

    pub fn participant_by_role(&self, role: Role) -> Option<&Participant> {
        self.participants().iter().find(|p| p.role == role)
    }

    pub fn participants_on_side(&self, side: Side) -> Vec<&Participant> {
        self.participants()
            .iter()
            .filter(|p| p.side == side)
            .collect()
    }

    // ==================== Floor & transient message ====================

    pub fn floor_holder(&self) -> Option<&ParticipantId> {
        self.floor_holder.as_ref()
    }

    /// Start accumulating a turn: sets the floor holder and a fresh
    /// transient message.
    pub fn begin_streaming(&mut self, participant_id: ParticipantId, stage: Stage) {
        self.streaming = Some(StreamingMessage::new(participant_id.clone(), stage));
        self.floor_holder = Some(participant_id);
    }

    pub fn streaming(&self) -> Option<&StreamingMessage> {
        self.streaming.as_ref()
    }

    pub fn append_token(&mut self, chunk: &str) {
        if let Some(msg) = self.streaming.as_mut() {
            msg.append_content(chunk);
        }
    }

    pub fn append_thinking(&mut self, chunk: &str) {
        if let Some(msg) = self.streaming.as_mut() {
            msg.append_reasoning(chunk);
        }
    }

    /// Drop the transient message and release the floor.
    ///
    /// Called on completion, error, and cancellation alike — the buffer
    /// is a preview, never promoted into the transcript.
    pub fn discard_streaming(&mut self) {
        self.streaming = None;
        self.floor_holder = None;
    }

    /// Drop the transient message only if the given participant still
    /// holds the floor. A cancelled turn's late cleanup must not clear
    /// the next floor-holder's state.
    pub fn discard_streaming_for(&mut self, participant_id: &ParticipantId) {
        if self.floor_holder.as_ref() == Some(participant_id) {
            self.discard_streaming();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use podium_domain::{CoinTossResult, SessionId, SessionStatus, Side};

    fn snapshot(messages: Vec<Message>) -> SessionSnapshot {
        SessionSnapshot {
            session: DebateSession {
                id: SessionId::from("s-1"),
                topic: "AI in Education".to_string(),
                current_stage: Stage::Opening,
                status: SessionStatus::Active,
                coin_toss: Some(CoinTossResult {
                    first_side: Side::Affirmative,
                }),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            participants: vec![
                Participant::ai("p-aff", "Aff Lead", Role::Affirmative1, "gpt-4o"),
                Participant::human("p-neg", "Neg Lead", Role::Negative1),
            ],
            messages,
        }
    }

    fn message(id: &str) -> Message {
        Message {
            id: id.to_string(),
            participant_id: ParticipantId::from("p-aff"),
            content: format!("content {}", id),
            reasoning: None,
            stage: Stage::Opening,
            round: 1,
            message_type: podium_domain::MessageType::Argument,
            audio_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn replace_exposes_backend_state() {
        let mut store = SessionStore::new();
        assert!(store.session().is_none());

        store.replace(snapshot(vec![message("m-1")]));
        assert_eq!(store.current_stage(), Some(Stage::Opening));
        assert_eq!(store.participants().len(), 2);
        assert_eq!(store.messages().len(), 1);
    }

    #[test]
    fn reload_preserves_message_order() {
        let mut store = SessionStore::new();
        store.replace(snapshot(vec![message("m-1"), message("m-2")]));

        // A reload after an appended turn keeps the prefix unchanged.
        store.replace(snapshot(vec![message("m-1"), message("m-2"), message("m-3")]));
        let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m-1", "m-2", "m-3"]);
    }

    #[test]
    fn lookup_by_role_and_side() {
        let mut store = SessionStore::new();
        store.replace(snapshot(vec![]));

        let aff = store.participant_by_role(Role::Affirmative1).unwrap();
        assert_eq!(aff.display_name, "Aff Lead");
        assert!(store.participant_by_role(Role::Judge).is_none());
        assert_eq!(store.participants_on_side(Side::Negative).len(), 1);
    }

    #[test]
    fn streaming_lifecycle() {
        let mut store = SessionStore::new();
        store.begin_streaming(ParticipantId::from("p-aff"), Stage::Opening);
        assert_eq!(store.floor_holder(), Some(&ParticipantId::from("p-aff")));

        store.append_token("The motion ");
        store.append_token("stands.");
        store.append_thinking("outline first");
        let msg = store.streaming().unwrap();
        assert_eq!(msg.content, "The motion stands.");
        assert_eq!(msg.reasoning, "outline first");

        store.discard_streaming();
        assert!(store.streaming().is_none());
        assert!(store.floor_holder().is_none());
    }

    #[test]
    fn replace_leaves_in_flight_turn_alone() {
        let mut store = SessionStore::new();
        store.begin_streaming(ParticipantId::from("p-aff"), Stage::Opening);
        store.append_token("partial");

        store.replace(snapshot(vec![message("m-1")]));
        assert_eq!(store.streaming().unwrap().content, "partial");
        assert!(store.floor_holder().is_some());
    }
}

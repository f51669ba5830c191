//! Debate session and participant entities

use super::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a debate session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a participant within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which side of the motion a participant argues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Affirmative,
    Negative,
    None,
}

/// Fixed role of a participant for the session's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(rename = "affirmative_1")]
    Affirmative1,
    #[serde(rename = "affirmative_2")]
    Affirmative2,
    #[serde(rename = "negative_1")]
    Negative1,
    #[serde(rename = "negative_2")]
    Negative2,
    Judge,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Affirmative1 => "affirmative_1",
            Role::Affirmative2 => "affirmative_2",
            Role::Negative1 => "negative_1",
            Role::Negative2 => "negative_2",
            Role::Judge => "judge",
            Role::Viewer => "viewer",
        }
    }

    /// The side implied by this role.
    pub fn side(&self) -> Side {
        match self {
            Role::Affirmative1 | Role::Affirmative2 => Side::Affirmative,
            Role::Negative1 | Role::Negative2 => Side::Negative,
            Role::Judge | Role::Viewer => Side::None,
        }
    }

    /// Whether this role argues for a side (judge and viewer do not).
    pub fn is_debater(&self) -> bool {
        self.side() != Side::None
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "affirmative_1" => Ok(Role::Affirmative1),
            "affirmative_2" => Ok(Role::Affirmative2),
            "negative_1" => Ok(Role::Negative1),
            "negative_2" => Ok(Role::Negative2),
            "judge" => Ok(Role::Judge),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Result of the one-time coin toss resolving initial speaking order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTossResult {
    /// Side that won the toss and speaks first
    pub first_side: Side,
}

/// A participant in a debate (Entity)
///
/// Role and side are fixed once the session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub role: Role,
    pub side: Side,
    /// Whether this participant is an AI speaker (streams via the backend)
    pub is_ai: bool,
    /// Model identifier for AI participants
    pub model: Option<String>,
}

impl Participant {
    pub fn ai(
        id: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id: ParticipantId(id.into()),
            display_name: display_name.into(),
            side: role.side(),
            role,
            is_ai: true,
            model: Some(model.into()),
        }
    }

    pub fn human(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: ParticipantId(id.into()),
            display_name: display_name.into(),
            side: role.side(),
            role,
            is_ai: false,
            model: None,
        }
    }
}

/// One active debate (Entity)
///
/// Mutated only by stage advancement and coin-toss resolution; both are
/// recorded by the backend and observed here through a full reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    pub id: SessionId,
    pub topic: String,
    pub current_stage: Stage,
    pub status: SessionStatus,
    pub coin_toss: Option<CoinTossResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebateSession {
    /// Record a stage transition.
    ///
    /// Accepts any target stage; the scheduler is the only component
    /// that may legitimately request a non-sequential one.
    pub fn advance_to(&mut self, next: Stage) {
        self.current_stage = next;
        if next.is_terminal() {
            self.status = SessionStatus::Completed;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_completed(&self) -> bool {
        self.current_stage.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DebateSession {
        DebateSession {
            id: SessionId::from("s-1"),
            topic: "AI in Education".to_string(),
            current_stage: Stage::Setup,
            status: SessionStatus::Active,
            coin_toss: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn role_implies_side() {
        assert_eq!(Role::Affirmative1.side(), Side::Affirmative);
        assert_eq!(Role::Negative2.side(), Side::Negative);
        assert_eq!(Role::Judge.side(), Side::None);
        assert!(Role::Affirmative2.is_debater());
        assert!(!Role::Viewer.is_debater());
    }

    #[test]
    fn advance_records_any_requested_stage() {
        let mut s = session();
        s.advance_to(Stage::Judgment);
        assert_eq!(s.current_stage, Stage::Judgment);
        assert_eq!(s.status, SessionStatus::Active);
    }

    #[test]
    fn advancing_to_completed_closes_the_session() {
        let mut s = session();
        s.advance_to(Stage::Completed);
        assert!(s.is_completed());
        assert_eq!(s.status, SessionStatus::Completed);
    }

    #[test]
    fn participant_constructors_fix_side_from_role() {
        let ai = Participant::ai("p-1", "Aff Lead", Role::Affirmative1, "gpt-4o");
        assert!(ai.is_ai);
        assert_eq!(ai.side, Side::Affirmative);
        assert_eq!(ai.model.as_deref(), Some("gpt-4o"));

        let human = Participant::human("p-2", "Neg Lead", Role::Negative1);
        assert!(!human.is_ai);
        assert_eq!(human.side, Side::Negative);
        assert!(human.model.is_none());
    }
}

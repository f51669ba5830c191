//! Wire types for the debate backend's REST API.
//!
//! The backend speaks camelCase JSON. These DTOs keep wire-format
//! concerns out of the domain types; each response converts into its
//! domain counterpart, failing with a protocol error on an answer the
//! orchestrator cannot interpret.

use chrono::{DateTime, Utc};
use podium_application::{BackendError, RoleAssignment, SessionSnapshot};
use podium_domain::{
    CoinTossResult, DebateSession, Message, MessageType, NextAction, Participant, ParticipantId,
    Role, SessionId, SessionStatus, Side, Stage,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub topic: String,
    pub assignments: Vec<AssignmentDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub role: Role,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl From<&RoleAssignment> for AssignmentDto {
    fn from(a: &RoleAssignment) -> Self {
        Self {
            role: a.role,
            display_name: a.display_name.clone(),
            model: a.model.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: SessionId,
    pub topic: String,
    pub current_stage: Stage,
    pub status: SessionStatus,
    #[serde(default)]
    pub coin_toss: Option<CoinTossDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTossDto {
    pub first_side: Side,
}

impl From<CoinTossDto> for CoinTossResult {
    fn from(dto: CoinTossDto) -> Self {
        CoinTossResult {
            first_side: dto.first_side,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub id: ParticipantId,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub side: Option<Side>,
    pub is_ai: bool,
    #[serde(default)]
    pub model: Option<String>,
}

impl From<ParticipantDto> for Participant {
    fn from(dto: ParticipantDto) -> Self {
        Participant {
            // Trust the backend's side when given; derive otherwise.
            side: dto.side.unwrap_or_else(|| dto.role.side()),
            id: dto.id,
            display_name: dto.display_name,
            role: dto.role,
            is_ai: dto.is_ai,
            model: dto.model,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub participant_id: ParticipantId,
    pub content: String,
    #[serde(default)]
    pub reasoning: Option<String>,
    pub stage: Stage,
    pub round: u32,
    pub message_type: MessageType,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Message {
            id: dto.id,
            participant_id: dto.participant_id,
            content: dto.content,
            reasoning: dto.reasoning,
            stage: dto.stage,
            round: dto.round,
            message_type: dto.message_type,
            audio_url: dto.audio_url,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub session: SessionDto,
    pub participants: Vec<ParticipantDto>,
    pub messages: Vec<MessageDto>,
}

impl From<SnapshotResponse> for SessionSnapshot {
    fn from(dto: SnapshotResponse) -> Self {
        SessionSnapshot {
            session: DebateSession {
                id: dto.session.id,
                topic: dto.session.topic,
                current_stage: dto.session.current_stage,
                status: dto.session.status,
                coin_toss: dto.session.coin_toss.map(Into::into),
                created_at: dto.session.created_at,
                updated_at: dto.session.updated_at,
            },
            participants: dto.participants.into_iter().map(Into::into).collect(),
            messages: dto.messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTossResponse {
    pub result: CoinTossDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceStageRequest {
    pub next_stage: Stage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub participant_id: ParticipantId,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    pub stage: Stage,
    pub language: String,
}

/// Answer to the scheduler query, keyed by `action`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideNextResponse {
    pub action: String,
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub next_stage: Option<Stage>,
}

impl DecideNextResponse {
    /// Interpret the wire answer as a [`NextAction`].
    pub fn into_action(self) -> Result<NextAction, BackendError> {
        match self.action.as_str() {
            "speak" => {
                let participant_id = self.participant_id.ok_or_else(|| {
                    BackendError::ProtocolError("speak action without participantId".to_string())
                })?;
                let stage = self.stage.ok_or_else(|| {
                    BackendError::ProtocolError("speak action without stage".to_string())
                })?;
                Ok(NextAction::Speak {
                    participant_id,
                    stage,
                })
            }
            "advance_stage" => {
                let next = self.next_stage.ok_or_else(|| {
                    BackendError::ProtocolError("advance_stage action without nextStage".to_string())
                })?;
                Ok(NextAction::AdvanceStage { next })
            }
            "complete" => Ok(NextAction::Complete),
            other => Err(BackendError::ProtocolError(format!(
                "Unknown scheduler action: {}",
                other
            ))),
        }
    }
}

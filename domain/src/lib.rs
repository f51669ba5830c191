//! Domain layer for podium
//!
//! This crate contains the core debate entities and pure logic.
//! It has no dependencies on infrastructure or I/O concerns.
//!
//! # Core Concepts
//!
//! ## Stage protocol
//!
//! A debate moves through a fixed sequence of stages
//! (`setup → coin_toss → opening → rebuttal → cross_exam → closing →
//! judgment → completed`). The [`Stage`] type records and orders them;
//! which transition happens next is decided by the backend scheduler,
//! not locally.
//!
//! ## Floor
//!
//! At most one participant holds the floor at a time. The floor-holder's
//! in-flight output is a [`StreamingMessage`] — a preview buffer that is
//! never promoted into the transcript. The transcript is always reloaded
//! from the backend once a turn completes.

pub mod debate;
pub mod schedule;
pub mod stream;

// Re-export commonly used types
pub use debate::{
    entities::{
        CoinTossResult, DebateSession, Participant, ParticipantId, Role, SessionId, SessionStatus,
        Side,
    },
    message::{Message, MessageType, StreamingMessage},
    stage::{Stage, StageParseError},
};
pub use schedule::NextAction;
pub use stream::{StreamEvent, StreamParseError, parse_event_line};

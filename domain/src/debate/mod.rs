//! Debate domain: stages, participants, sessions, and messages

pub mod entities;
pub mod message;
pub mod stage;

//! Application layer for podium
//!
//! This crate contains use cases, port definitions, the in-memory
//! session store, and the audio sequencer. It depends only on the
//! domain layer.

pub mod audio;
pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use audio::sequencer::AudioSequencer;
pub use ports::{
    audio_output::{AudioError, AudioOutput, NullAudioOutput},
    backend::{BackendError, DebateBackend, RoleAssignment, SessionSnapshot, StreamHandle},
    observer::{NoObserver, SessionObserver},
    resume_cache::{RecentSession, ResumeCache},
};
pub use store::session_store::SessionStore;
pub use use_cases::orchestrator::{DebateOrchestrator, OrchestratorError, StepOutcome};
pub use use_cases::resume::try_resume;
pub use use_cases::stream_turn::{StreamCoordinator, TurnOutcome};

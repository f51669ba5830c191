//! Session observation port
//!
//! Consumers register an explicit observer instead of relying on
//! implicit reactivity; the orchestrator and stream coordinator call
//! these hooks as the debate progresses. Implementations live in the
//! presentation edge (the CLI's console observer).

use podium_domain::{Participant, Stage};

/// Callbacks for debate progress
///
/// All methods have no-op defaults so implementations pick what they
/// care about.
pub trait SessionObserver: Send + Sync {
    /// A participant took the floor.
    fn on_turn_start(&self, _participant: &Participant, _stage: Stage) {}

    /// A content token arrived for the transient message.
    fn on_token(&self, _chunk: &str) {}

    /// A reasoning token arrived for the transient message.
    fn on_thinking(&self, _chunk: &str) {}

    /// The turn completed and the transcript was reloaded.
    fn on_turn_committed(&self, _participant: &Participant) {}

    /// The session moved to a new stage.
    fn on_stage_changed(&self, _stage: Stage) {}

    /// The debate reached its terminal stage.
    fn on_debate_complete(&self) {}
}

/// No-op observer for when nothing is watching
pub struct NoObserver;

impl SessionObserver for NoObserver {}

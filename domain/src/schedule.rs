//! Scheduler actions.
//!
//! [`NextAction`] is the answer to the backend's "what happens next"
//! query. Asking is side-effect free; the orchestrator's job is solely
//! to execute the returned action.

use crate::debate::entities::ParticipantId;
use crate::debate::stage::Stage;

/// The next thing the debate should do, as decided by the backend
/// scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Stream the given participant's turn under the given stage.
    Speak {
        participant_id: ParticipantId,
        stage: Stage,
    },
    /// Advance the session to the given stage, then reload.
    AdvanceStage { next: Stage },
    /// The debate is over; stop scheduling.
    Complete,
}

impl NextAction {
    /// Returns true if this action ends automatic scheduling.
    pub fn is_complete(&self) -> bool {
        matches!(self, NextAction::Complete)
    }
}

//! Resume cache port
//!
//! An advisory, expendable local record of recent sessions and a
//! "current session" pointer, used only to restore client state across
//! restarts. Failures here must never fail the debate; implementations
//! log and return defaults instead of erroring where possible.

use chrono::{DateTime, Utc};
use podium_domain::SessionId;
use serde::{Deserialize, Serialize};

/// One remembered session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSession {
    pub session_id: SessionId,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Local record of recent sessions, capped and age-evicted.
///
/// Entries older than the recency horizon (7 days) disappear on the
/// next evict cycle; the current-session pointer has a shorter horizon
/// (24 hours) and is cleared rather than followed when stale.
pub trait ResumeCache: Send + Sync {
    /// Remember a session, bumping its `updated_at` if already present.
    fn record_recent(&self, session_id: &SessionId, topic: &str);

    /// List remembered sessions, most recently updated first.
    fn recent(&self) -> Vec<RecentSession>;

    /// Drop entries past their horizon (including a stale pointer).
    fn evict_expired(&self);

    /// Point "current session" at the given id.
    fn point_current(&self, session_id: &SessionId);

    /// The current-session pointer, if present and fresh.
    fn current(&self) -> Option<SessionId>;

    /// Clear the current-session pointer.
    fn clear_current(&self);
}

//! Session resumption from the advisory local cache.
//!
//! The cache is not authoritative: a remembered session that fails to
//! load clears the pointer and is not a debate-state error.

use crate::ports::backend::DebateBackend;
use crate::ports::resume_cache::ResumeCache;
use crate::use_cases::orchestrator::DebateOrchestrator;
use podium_domain::SessionId;
use tracing::{info, warn};

/// Try to reattach to the cached "current session".
///
/// Evicts expired entries first, so a stale pointer never reaches the
/// backend. Returns the session id on success, `None` when there is
/// nothing fresh to resume or the reload failed.
pub async fn try_resume<B: DebateBackend + 'static>(
    orchestrator: &DebateOrchestrator<B>,
    cache: &dyn ResumeCache,
) -> Option<SessionId> {
    cache.evict_expired();

    let id = cache.current()?;
    match orchestrator.load_session(&id).await {
        Ok(()) => {
            info!("Resumed session {}", id);
            Some(id)
        }
        Err(e) => {
            // Advisory cache only: give up on the pointer, don't retry.
            warn!("Could not resume session {}: {}", id, e);
            cache.clear_current();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sequencer::AudioSequencer;
    use crate::ports::audio_output::NullAudioOutput;
    use crate::ports::resume_cache::RecentSession;
    use crate::use_cases::testing::{MockBackend, base_snapshot};
    use std::sync::{Arc, Mutex};

    struct FakeCache {
        current: Mutex<Option<SessionId>>,
        cleared: Mutex<bool>,
        evicted: Mutex<bool>,
    }

    impl FakeCache {
        fn pointing_at(id: &str) -> Self {
            Self {
                current: Mutex::new(Some(SessionId::from(id))),
                cleared: Mutex::new(false),
                evicted: Mutex::new(false),
            }
        }
    }

    impl ResumeCache for FakeCache {
        fn record_recent(&self, _session_id: &SessionId, _topic: &str) {}
        fn recent(&self) -> Vec<RecentSession> {
            vec![]
        }
        fn evict_expired(&self) {
            *self.evicted.lock().unwrap() = true;
        }
        fn point_current(&self, _session_id: &SessionId) {}
        fn current(&self) -> Option<SessionId> {
            self.current.lock().unwrap().clone()
        }
        fn clear_current(&self) {
            *self.cleared.lock().unwrap() = true;
            *self.current.lock().unwrap() = None;
        }
    }

    fn orchestrator(backend: Arc<MockBackend>) -> DebateOrchestrator<MockBackend> {
        let sequencer = Arc::new(AudioSequencer::new(Arc::new(NullAudioOutput)));
        DebateOrchestrator::new(backend, sequencer)
    }

    #[tokio::test]
    async fn resumes_a_fresh_pointer() {
        let backend = Arc::new(MockBackend::new());
        backend.set_snapshot(base_snapshot());
        let orchestrator = orchestrator(backend);
        let cache = FakeCache::pointing_at("s-1");

        let resumed = try_resume(&orchestrator, &cache).await;
        assert_eq!(resumed, Some(SessionId::from("s-1")));
        assert!(*cache.evicted.lock().unwrap());
        assert!(!*cache.cleared.lock().unwrap());
        assert!(orchestrator.topic().is_some());
    }

    #[tokio::test]
    async fn failed_reload_clears_the_pointer() {
        // Backend has no such session; the pointer must be cleared,
        // not retried, and no error surfaces.
        let backend = Arc::new(MockBackend::new());
        let orchestrator = orchestrator(backend);
        let cache = FakeCache::pointing_at("s-gone");

        let resumed = try_resume(&orchestrator, &cache).await;
        assert!(resumed.is_none());
        assert!(*cache.cleared.lock().unwrap());
    }

    #[tokio::test]
    async fn nothing_to_resume_is_quiet() {
        let backend = Arc::new(MockBackend::new());
        let orchestrator = orchestrator(backend);
        let cache = FakeCache {
            current: Mutex::new(None),
            cleared: Mutex::new(false),
            evicted: Mutex::new(false),
        };

        assert!(try_resume(&orchestrator, &cache).await.is_none());
        assert!(!*cache.cleared.lock().unwrap());
    }
}

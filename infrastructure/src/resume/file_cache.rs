//! JSON file adapter for the [`ResumeCache`] port.
//!
//! One small file under the platform cache directory holds the recent
//! session list and the current-session pointer. Everything here is
//! best-effort: read or write failures log a warning and fall back to
//! defaults, never failing the debate.

use chrono::{DateTime, Duration, Utc};
use podium_application::{RecentSession, ResumeCache};
use podium_domain::SessionId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default cap on remembered sessions.
const DEFAULT_MAX_ENTRIES: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurrentPointer {
    session_id: SessionId,
    set_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    recent: Vec<RecentSession>,
    #[serde(default)]
    current: Option<CurrentPointer>,
}

/// Resume cache persisted as a JSON file.
pub struct FileResumeCache {
    path: PathBuf,
    max_entries: usize,
    /// Entries older than this disappear on the next evict cycle.
    recent_horizon: Duration,
    /// The current-session pointer goes stale after this.
    current_horizon: Duration,
}

impl FileResumeCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
            recent_horizon: Duration::days(7),
            current_horizon: Duration::hours(24),
        }
    }

    /// Cache file under the platform cache directory, or `None` when no
    /// cache directory exists.
    pub fn at_default_path() -> Option<Self> {
        let path = dirs::cache_dir()?.join("podium").join("recent_sessions.json");
        Some(Self::new(path))
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_horizons(mut self, recent: Duration, current: Duration) -> Self {
        self.recent_horizon = recent;
        self.current_horizon = current;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CacheFile {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            // Missing file is the normal first-run case.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheFile::default(),
            Err(e) => {
                warn!("Could not read resume cache {}: {}", self.path.display(), e);
                return CacheFile::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(file) => file,
            Err(e) => {
                warn!("Resume cache {} is corrupt, starting fresh: {}", self.path.display(), e);
                CacheFile::default()
            }
        }
    }

    fn save(&self, file: &CacheFile) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create cache directory {}: {}", parent.display(), e);
            return;
        }
        let Ok(json) = serde_json::to_vec_pretty(file) else {
            return;
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("Could not write resume cache {}: {}", self.path.display(), e);
        }
    }

    fn pointer_is_fresh(&self, pointer: &CurrentPointer) -> bool {
        Utc::now() - pointer.set_at <= self.current_horizon
    }
}

impl ResumeCache for FileResumeCache {
    fn record_recent(&self, session_id: &SessionId, topic: &str) {
        let mut file = self.load();
        let now = Utc::now();

        if let Some(pos) = file.recent.iter().position(|e| &e.session_id == session_id) {
            let mut entry = file.recent.remove(pos);
            entry.topic = topic.to_string();
            entry.updated_at = now;
            file.recent.insert(0, entry);
        } else {
            file.recent.insert(
                0,
                RecentSession {
                    session_id: session_id.clone(),
                    topic: topic.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        file.recent.truncate(self.max_entries);
        self.save(&file);
    }

    fn recent(&self) -> Vec<RecentSession> {
        self.load().recent
    }

    fn evict_expired(&self) {
        let mut file = self.load();
        let now = Utc::now();

        file.recent
            .retain(|entry| now - entry.updated_at <= self.recent_horizon);
        if let Some(pointer) = &file.current
            && !self.pointer_is_fresh(pointer)
        {
            file.current = None;
        }
        self.save(&file);
    }

    fn point_current(&self, session_id: &SessionId) {
        let mut file = self.load();
        file.current = Some(CurrentPointer {
            session_id: session_id.clone(),
            set_at: Utc::now(),
        });
        self.save(&file);
    }

    fn current(&self) -> Option<SessionId> {
        let file = self.load();
        let pointer = file.current?;
        // A stale pointer is as good as absent.
        self.pointer_is_fresh(&pointer)
            .then_some(pointer.session_id)
    }

    fn clear_current(&self) {
        let mut file = self.load();
        file.current = None;
        self.save(&file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache(dir: &TempDir) -> FileResumeCache {
        FileResumeCache::new(dir.path().join("recent_sessions.json"))
    }

    #[test]
    fn records_and_orders_recent_sessions() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.record_recent(&SessionId::from("s-1"), "First");
        cache.record_recent(&SessionId::from("s-2"), "Second");
        // Touching s-1 bumps it back to the front.
        cache.record_recent(&SessionId::from("s-1"), "First again");

        let recent = cache.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].session_id, SessionId::from("s-1"));
        assert_eq!(recent[0].topic, "First again");
        assert_eq!(recent[1].session_id, SessionId::from("s-2"));
    }

    #[test]
    fn caps_the_entry_count() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir).with_max_entries(3);

        for i in 0..5 {
            cache.record_recent(&SessionId(format!("s-{}", i)), "topic");
        }
        let recent = cache.recent();
        assert_eq!(recent.len(), 3);
        // Newest first; the two oldest were dropped.
        assert_eq!(recent[0].session_id, SessionId::from("s-4"));
    }

    #[test]
    fn evicts_entries_past_the_recency_horizon() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        let old = Utc::now() - Duration::days(8);
        cache.save(&CacheFile {
            recent: vec![
                RecentSession {
                    session_id: SessionId::from("s-old"),
                    topic: "stale".to_string(),
                    created_at: old,
                    updated_at: old,
                },
                RecentSession {
                    session_id: SessionId::from("s-new"),
                    topic: "fresh".to_string(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
            ],
            current: None,
        });

        cache.evict_expired();
        let recent = cache.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].session_id, SessionId::from("s-new"));
    }

    #[test]
    fn stale_pointer_is_absent_and_cleared_by_evict() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.save(&CacheFile {
            recent: vec![],
            current: Some(CurrentPointer {
                session_id: SessionId::from("s-1"),
                set_at: Utc::now() - Duration::hours(25),
            }),
        });

        // Stale: never returned, even before the evict cycle runs.
        assert!(cache.current().is_none());

        cache.evict_expired();
        assert!(cache.load().current.is_none());
    }

    #[test]
    fn fresh_pointer_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);

        cache.point_current(&SessionId::from("s-7"));
        assert_eq!(cache.current(), Some(SessionId::from("s-7")));

        cache.clear_current();
        assert!(cache.current().is_none());
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        std::fs::write(cache.path(), b"{ not json").unwrap();

        assert!(cache.recent().is_empty());
        assert!(cache.current().is_none());
    }
}

//! In-Memory Session Store
//!
//! Thread-safe store of live quiz sessions keyed by server-issued UUID.
//! Uses DashMap for concurrent access without lock contention.
//!
//! Features:
//! - TTL-based expiration (30 minutes default)
//! - Expired sessions swept periodically; abandoned quizzes just age out
//! - Created/expired counters for the stats endpoint

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::sequencer::QuizSession;
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::DEFAULT_SESSION_TTL_SECS;

/// One stored session with its expiry bookkeeping
#[derive(Debug)]
struct SessionEntry {
    session: QuizSession,
    last_active: Instant,
    ttl_secs: u64,
}

impl SessionEntry {
    fn new(ttl_secs: u64) -> Self {
        Self {
            session: QuizSession::new(),
            last_active: Instant::now(),
            ttl_secs,
        }
    }

    fn is_expired(&self) -> bool {
        self.last_active.elapsed() > Duration::from_secs(self.ttl_secs)
    }
}

/// Store statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct SessionStoreStats {
    pub active: usize,
    pub created: u64,
    pub expired: u64,
    pub ttl_secs: u64,
}

/// Thread-safe TTL store of quiz sessions
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionEntry>>,
    ttl_secs: u64,
    created: Arc<AtomicU64>,
    expired: Arc<AtomicU64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// New store with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL_SECS)
    }

    /// New store with a custom TTL
    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl_secs,
            created: Arc::new(AtomicU64::new(0)),
            expired: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a fresh session and return its id
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), SessionEntry::new(self.ttl_secs));
        self.created.fetch_add(1, Ordering::Relaxed);
        info!("Session created: {}", id);
        id
    }

    /// Run a closure against a live session, refreshing its TTL
    ///
    /// Expired entries are removed on access and reported as such; the
    /// closure's own error is passed straight through.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut QuizSession) -> AppResult<R>,
    ) -> AppResult<R> {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                if entry.is_expired() {
                    drop(entry);
                    self.sessions.remove(id);
                    self.expired.fetch_add(1, Ordering::Relaxed);
                    debug!("Session expired on access: {}", id);
                    return Err(AppError::session_expired(id));
                }
                entry.last_active = Instant::now();
                f(&mut entry.session)
            }
            None => Err(AppError::session_not_found(id)),
        }
    }

    /// Drop a session explicitly
    pub fn remove(&self, id: &str) {
        self.sessions.remove(id);
        debug!("Session removed: {}", id);
    }

    /// Sweep all expired entries; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired());
        let removed = before - self.sessions.len();
        if removed > 0 {
            self.expired.fetch_add(removed as u64, Ordering::Relaxed);
            info!("Session sweep: {} expired sessions removed", removed);
        }
        removed
    }

    /// Current store statistics
    pub fn stats(&self) -> SessionStoreStats {
        SessionStoreStats {
            active: self.sessions.len(),
            created: self.created.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            ttl_secs: self.ttl_secs,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question_bank::QuestionId;

    #[test]
    fn test_create_and_access() {
        let store = SessionStore::new();
        let id = store.create();

        let result = store.with_session(&id, |session| {
            session.select_answer(QuestionId::Age, "45-54")?;
            Ok(session.answers().len())
        });

        assert_eq!(result.unwrap(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        let err = store.with_session("nope", |_| Ok(())).unwrap_err();
        assert_eq!(err.code_str(), "QUIZ_SESSION_NOT_FOUND");
    }

    #[test]
    fn test_expired_session_removed_on_access() {
        let store = SessionStore::with_ttl(0);
        let id = store.create();
        std::thread::sleep(Duration::from_millis(10));

        let err = store.with_session(&id, |_| Ok(())).unwrap_err();
        assert_eq!(err.code_str(), "QUIZ_SESSION_EXPIRED");
        assert!(store.is_empty());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::with_ttl(0);
        store.create();
        store.create();
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(store.cleanup_expired(), 2);
        assert_eq!(store.stats().expired, 2);
        assert_eq!(store.stats().created, 2);
    }

    #[test]
    fn test_state_persists_between_accesses() {
        let store = SessionStore::new();
        let id = store.create();

        store
            .with_session(&id, |session| session.select_answer(QuestionId::Age, "under-35"))
            .unwrap();

        let answered = store
            .with_session(&id, |session| Ok(session.answers().contains_key(&QuestionId::Age)))
            .unwrap();
        assert!(answered);
    }
}

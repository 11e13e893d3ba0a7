// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::chat_session::ChatSession;
use super::transcript::Exchange;

/// Shared handle to one session. Holding the lock is what keeps a session
/// to a single in-flight submission.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, SessionHandle>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    // Create a fresh session and return its id. Expired sessions are dropped first.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(ChatSession::new(id.clone())));

        let mut guard = self.inner.write().await;
        self.purge_locked(&mut guard);
        guard.insert(id.clone(), session);
        tracing::info!(session_id = %id, "session started");
        id
    }

    // Return the session with this id, starting an empty one if it is unknown.
    // The returned handle keeps the session alive until it is dropped.
    pub async fn ensure_session(&self, id: &str) -> SessionHandle {
        {
            let guard = self.inner.read().await;
            if let Some(session) = guard.get(id) {
                touch_if_idle(session);
                return Arc::clone(session);
            }
        }
        let mut guard = self.inner.write().await;
        if let Some(session) = guard.get(id) {
            touch_if_idle(session);
            return Arc::clone(session);
        }
        self.purge_locked(&mut guard);
        let session = Arc::new(Mutex::new(ChatSession::new(id)));
        guard.insert(id.to_string(), Arc::clone(&session));
        tracing::info!(session_id = %id, "session started");
        session
    }

    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    /// Snapshot of a session's transcript, in conversation order.
    ///
    /// Waits for any submission in flight on that session to finish.
    pub async fn transcript(&self, id: &str) -> Option<Vec<Exchange>> {
        let session = self.get(id).await?;
        let session = session.lock().await;
        Some(session.transcript().all().to_vec())
    }

    /// End a session. Its transcript is discarded.
    pub async fn remove_session(&self, id: &str) -> bool {
        let mut guard = self.inner.write().await;
        let removed = guard.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "session ended");
        }
        removed
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        self.purge_locked(&mut guard)
    }

    // A session is kept while anyone outside the map holds its handle or its
    // lock, i.e. while a request is using it.
    fn purge_locked(&self, sessions: &mut HashMap<String, SessionHandle>) -> usize {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, session| {
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(session) => now.duration_since(session.last_active()) < self.ttl,
                Err(_) => true,
            }
        });
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "dropped idle sessions");
        }
        purged
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn touch_if_idle(session: &SessionHandle) {
    // A locked session is mid-submission and touches itself.
    if let Ok(mut session) = session.try_lock() {
        session.touch();
    }
}

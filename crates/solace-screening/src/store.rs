//! Session persistence.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use solace_core::models::session::SessionState;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;

/// Idle lifetime of a session before it is discarded.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_secs(600);

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session. Expired sessions are reported as absent.
    async fn load(&self, id: Uuid) -> Result<Option<SessionState>, StoreError>;

    /// Insert or replace the session record.
    async fn save(&self, state: &SessionState) -> Result<(), StoreError>;

    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    /// Drop every expired record. Returns how many were dropped.
    async fn purge_expired(&self) -> Result<usize, StoreError>;
}

/// Process-local store. Records are lost on restart.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, SessionState>>,
    ttl: SignedDuration,
}

impl MemorySessionStore {
    pub fn new(ttl: SignedDuration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub(crate) async fn load_at(&self, id: Uuid, now: Timestamp) -> Option<SessionState> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(&id) {
            Some(state) if state.is_expired(self.ttl, now) => {
                sessions.remove(&id);
                tracing::info!(session_id = %id, "session expired");
                None
            }
            Some(state) => Some(state.clone()),
            None => None,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<SessionState>, StoreError> {
        Ok(self.load_at(id, Timestamp::now()).await)
    }

    async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .await
            .insert(state.session_id, state.clone());
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.sessions.lock().await.remove(&id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = Timestamp::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, state| !state.is_expired(self.ttl, now));
        Ok(before - sessions.len())
    }
}

//! In-memory session store with expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::ports::{Session, SessionError, SessionStore};

/// Session store backed by a HashMap with async RwLock.
///
/// Note: sessions are lost on process restart, which logs everyone out.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: TimeDelta,
}

impl InMemorySessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(session: &Session) -> bool {
        Utc::now() > session.expires_at
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(TimeDelta::hours(24))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn open(&self, user_id: Uuid) -> Result<Session, SessionError> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !Self::is_expired(s));
        sessions.insert(session.id, session.clone());

        Ok(session)
    }

    async fn find(&self, session_id: Uuid) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        let Some(session) = sessions.get(&session_id) else {
            return Ok(None);
        };

        if Self::is_expired(session) {
            drop(sessions);
            self.sessions.write().await.remove(&session_id);
            return Ok(None);
        }

        Ok(Some(session.clone()))
    }

    async fn terminate(&self, session_id: Uuid) -> Result<(), SessionError> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }

    async fn terminate_user(&self, user_id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        tracing::debug!(
            user_id = %user_id,
            ended = before - sessions.len(),
            "Terminated user sessions"
        );
        Ok(())
    }
}

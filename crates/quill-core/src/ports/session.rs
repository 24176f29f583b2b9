//! Session store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A server-side login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Session store - tracks which logins are still live.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a new session for the user.
    async fn open(&self, user_id: Uuid) -> Result<Session, SessionError>;

    /// Look up a live session. Expired sessions are treated as absent.
    async fn find(&self, session_id: Uuid) -> Result<Option<Session>, SessionError>;

    /// End one session. Ending an unknown session is not an error.
    async fn terminate(&self, session_id: Uuid) -> Result<(), SessionError>;

    /// End every session of the user.
    async fn terminate_user(&self, user_id: Uuid) -> Result<(), SessionError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session backend error: {0}")]
    Backend(String),
}

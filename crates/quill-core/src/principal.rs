//! The acting principal of a request.
//!
//! Principals are resolved once per request by the session provider and
//! passed explicitly into every guard and workflow call.

use uuid::Uuid;

use crate::domain::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    User {
        id: Uuid,
        is_active: bool,
        /// Session the principal was resolved from, if any.
        session_id: Option<Uuid>,
    },
}

impl Principal {
    /// Principal for a user logged in through `session_id`.
    pub fn from_session(user: &User, session_id: Uuid) -> Self {
        Self::User {
            id: user.id,
            is_active: user.is_active,
            session_id: Some(session_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::User { is_active: true, .. })
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::User { id, .. } => Some(*id),
            Self::Anonymous => None,
        }
    }

    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            Self::User { session_id, .. } => *session_id,
            Self::Anonymous => None,
        }
    }

    /// Identity equality against a record's owner. Anonymous owns nothing.
    pub fn is(&self, user_id: Uuid) -> bool {
        self.id() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_owns_nothing() {
        let principal = Principal::Anonymous;
        assert!(!principal.is_authenticated());
        assert!(!principal.is_active());
        assert!(!principal.is(Uuid::nil()));
    }

    #[test]
    fn inactive_user_is_still_authenticated() {
        let id = Uuid::new_v4();
        let principal = Principal::User {
            id,
            is_active: false,
            session_id: None,
        };
        assert!(principal.is_authenticated());
        assert!(!principal.is_active());
        assert!(principal.is(id));
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::guard::{self, account as account_guard};
use crate::ports::{PasswordService, SessionStore, TokenService, UserRepository};
use crate::principal::Principal;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub session_id: Uuid,
    pub token: String,
    pub expires_in: i64,
}

/// Account workflows and the principal/session provider.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            passwords,
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let Registration {
            username,
            email,
            password,
        } = registration;
        let username = username.trim().to_string();

        if username.is_empty() {
            return Err(DomainError::Validation("username is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("invalid email address".to_string()));
        }
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Duplicate("username already taken".to_string()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&password)?;
        let user = self
            .users
            .save(User::new(username, email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and open a session.
    ///
    /// Every failure is a validation error so the caller can re-render its
    /// login form with the message.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let invalid = || DomainError::Validation("invalid credentials".to_string());
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(invalid)?;
        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(invalid());
        }
        if !user.is_active {
            tracing::info!(user_id = %user.id, "Login rejected: account disabled");
            return Err(DomainError::Validation("account is disabled".to_string()));
        }

        let session = self.sessions.open(user.id).await?;
        let token = self.tokens.generate_token(user.id, session.id)?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "User logged in");
        Ok(LoginOutcome {
            user,
            session_id: session.id,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Resolve a bearer token to the acting principal.
    ///
    /// Missing, invalid or expired tokens, ended sessions and deleted
    /// accounts all resolve to [`Principal::Anonymous`].
    pub async fn resolve(&self, token: Option<&str>) -> Result<Principal, DomainError> {
        let Some(token) = token else {
            return Ok(Principal::Anonymous);
        };

        let claims = match self.tokens.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable bearer token");
                return Ok(Principal::Anonymous);
            }
        };

        let live = self
            .sessions
            .find(claims.session_id)
            .await?
            .is_some_and(|s| s.user_id == claims.user_id);
        if !live {
            return Ok(Principal::Anonymous);
        }

        Ok(match self.users.find_by_id(claims.user_id).await? {
            Some(user) => Principal::from_session(&user, claims.session_id),
            None => Principal::Anonymous,
        })
    }

    /// End the principal's current session. Anonymous principals are a no-op.
    pub async fn logout(&self, principal: &Principal) -> Result<(), DomainError> {
        if let Some(session_id) = principal.session_id() {
            self.sessions.terminate(session_id).await?;
            tracing::info!(user_id = ?principal.id(), session_id = %session_id, "User logged out");
        }
        Ok(())
    }

    pub async fn profile(&self, principal: &Principal) -> Result<User, DomainError> {
        guard::Pipeline::new()
            .then(guard::Check::Authenticated)
            .evaluate(principal)
            .ensure("view a profile")?;
        let user_id = principal.id().ok_or(DomainError::Unauthenticated)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    /// Delete the principal's own account, then end all of its sessions.
    pub async fn delete_self(&self, principal: &Principal) -> Result<(), DomainError> {
        account_guard::can_delete_self(principal)
            .ensure("delete this account")
            .inspect_err(|e| tracing::warn!(error = %e, "Account deletion denied"))?;
        let user_id = principal.id().ok_or(DomainError::Unauthenticated)?;

        self.users.delete(user_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("user", user_id),
            other => other.into(),
        })?;
        self.sessions.terminate_user(user_id).await?;

        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}

//! Authentication Service
//!
//! Signup, login, logout, and per-request session resolution. The
//! cookie carries an opaque token; everything else lives server-side.

use std::sync::Arc;

use crate::domain::{normalize_email, Session, User};
use crate::error::{AppError, Result};
use crate::repository::{SessionRepository, UserRepository};
use crate::service::PasswordService;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    passwords: PasswordService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            users,
            sessions,
            passwords: PasswordService::new(),
        }
    }

    /// Create a new attendee account. Email uniqueness is
    /// case-insensitive; storage holds the normalized form.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("Name, email and password are required"));
        }

        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate_email(&email));
        }

        let hash = self.passwords.hash_password(password)?;
        let user = User::new(name.trim(), email, hash);
        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Verify credentials and open a session. Unknown emails and wrong
    /// passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session)> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if !self.passwords.verify_password(password, &user.password_hash) {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let session = Session::issue(&user.id);
        self.sessions.insert(&session).await?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, session))
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.delete(token).await
    }

    /// Resolve a session token to its user. Missing sessions and
    /// deleted users resolve to anonymous, never an error.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let Some(session) = self.sessions.find(token).await? else {
            return Ok(None);
        };
        self.users.find_by_id(&session.user_id).await
    }
}

//! Repository trait for bearer session tokens.

use crate::domain::entities::User;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Session record. Only the HMAC of the raw token is stored.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Repository interface for session validation and management.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Resolves a token hash to its user.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(User))` if the session exists, is not revoked and has not expired
    /// - `Ok(None)` otherwise
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Updates the `last_used_at` timestamp for a session.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Creates a session for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a session with the same hash exists.
    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Session, AppError>;

    /// Revokes a session. Returns `false` if it did not exist or was already revoked.
    async fn revoke_session(&self, id: i64) -> Result<bool, AppError>;
}

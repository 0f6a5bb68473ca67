//! Authentication service for bearer session tokens.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::entities::CurrentUser;
use crate::domain::repositories::{Session, SessionRepository};
use crate::error::AppError;
use crate::utils::session_token::{generate_session_token, hash_session_token};
use serde_json::json;
use uuid::Uuid;

/// Service for authenticating requests via bearer session tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: SessionRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: SessionRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - session repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when sessions were issued
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    fn hash_token(&self, token: &str) -> String {
        hash_session_token(&self.signing_secret, token)
    }

    /// Resolves a raw token to the user it belongs to.
    ///
    /// On success, updates the session's `last_used_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, revoked or
    /// expired. Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_hash = self.hash_token(token);

        let user = self
            .repository
            .find_user_by_token(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid, expired or revoked session"}),
                )
            })?;

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::debug!(error = %e, "Failed to update session last_used_at");
        }

        Ok(user.into())
    }

    /// Issues a new session for `user_id`.
    ///
    /// Returns the raw token, which is not stored and cannot be recovered.
    pub async fn issue_session(
        &self,
        user_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(String, Session), AppError> {
        let token = generate_session_token();
        let session = self
            .repository
            .create_session(user_id, &self.hash_token(&token), expires_at)
            .await?;

        Ok((token, session))
    }

    pub async fn revoke_session(&self, id: i64) -> Result<bool, AppError> {
        self.repository.revoke_session(id).await
    }
}

//! Repository trait for user accounts.

use crate::domain::entities::{User, UserRole};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for user accounts.
///
/// Accounts are owned by the auth provider; this service reads them and the
/// admin CLI can create them for local setups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(
        &self,
        email: &str,
        full_name: Option<String>,
        role: UserRole,
    ) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users, newest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

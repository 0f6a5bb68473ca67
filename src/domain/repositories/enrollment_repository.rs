//! Repository trait for enrollments.

use crate::domain::entities::{Enrollment, NewEnrollment};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for enrollments.
///
/// The (user, course) pair is unique at the database level. Inserts go through
/// [`EnrollmentRepository::create_if_absent`], so concurrent requests for the same
/// pair produce exactly one row.
///
/// # Examples
///
/// See integration tests: `tests/repository_enrollment.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Finds the enrollment for a user and course.
    async fn find(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Enrollment>, AppError>;

    /// Inserts an enrollment unless one already exists for the pair.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Enrollment))` if a row was created
    /// - `Ok(None)` if the pair was already enrolled
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_if_absent(
        &self,
        new_enrollment: NewEnrollment,
    ) -> Result<Option<Enrollment>, AppError>;

    /// Lists a user's enrollments, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, AppError>;
}

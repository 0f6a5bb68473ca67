//! Repository trait for courses.

use crate::domain::entities::{Course, CourseStatus, NewCourse};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for courses.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCourseRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_course.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Creates a course in `draft` status.
    async fn create(&self, new_course: NewCourse) -> Result<Course, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AppError>;

    /// Lists published courses, newest first.
    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<Course>, AppError>;

    async fn count_published(&self) -> Result<i64, AppError>;

    /// Moves a course to `status`, keeping `is_published` in sync with it.
    ///
    /// The update only applies while the course is still in `expected`, so two
    /// reviewers acting at once cannot both win.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Course))` with the updated course
    /// - `Ok(None)` if the course was not in `expected`
    async fn update_status(
        &self,
        id: Uuid,
        expected: CourseStatus,
        status: CourseStatus,
        rejection_reason: Option<String>,
    ) -> Result<Option<Course>, AppError>;
}

//! PostgreSQL implementation of course repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::rows::CourseRow;
use crate::domain::entities::{Course, CourseStatus, NewCourse};
use crate::domain::repositories::CourseRepository;
use crate::error::AppError;

const COURSE_COLUMNS: &str = "id, title, description, price, currency, instructor_id, \
     is_published, status, rejection_reason, created_at, updated_at";

/// PostgreSQL repository for courses.
pub struct PgCourseRepository {
    pool: Arc<PgPool>,
}

impl PgCourseRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn create(&self, new_course: NewCourse) -> Result<Course, AppError> {
        let sql = format!(
            "INSERT INTO courses (id, title, description, price, currency, instructor_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COURSE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_course.title)
            .bind(new_course.description)
            .bind(new_course.price)
            .bind(new_course.currency)
            .bind(new_course.instructor_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AppError> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");

        sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<Course>, AppError> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             WHERE is_published AND status = 'published' \
             ORDER BY created_at DESC \
             OFFSET $1 LIMIT $2"
        );

        sqlx::query_as::<_, CourseRow>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn count_published(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE is_published AND status = 'published'",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    /// Compare-and-set on `status`; returns `None` if the course is missing or
    /// no longer in `expected`. `is_published` follows the new status.
    async fn update_status(
        &self,
        id: Uuid,
        expected: CourseStatus,
        status: CourseStatus,
        rejection_reason: Option<String>,
    ) -> Result<Option<Course>, AppError> {
        let sql = format!(
            "UPDATE courses \
             SET status = $3, \
                 is_published = ($3 = 'published'), \
                 rejection_reason = $4, \
                 updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {COURSE_COLUMNS}"
        );

        sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id)
            .bind(expected.as_str())
            .bind(status.as_str())
            .bind(rejection_reason)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }
}

//! PostgreSQL implementation of enrollment repository.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use super::rows::EnrollmentRow;
use crate::domain::entities::{Enrollment, NewEnrollment};
use crate::domain::repositories::EnrollmentRepository;
use crate::error::AppError;

/// PostgreSQL repository for enrollments.
///
/// Uniqueness of (user, course) is enforced by the `enrollments_user_course_key`
/// constraint, so concurrent writers cannot produce duplicates.
pub struct PgEnrollmentRepository {
    pool: Arc<PgPool>,
}

impl PgEnrollmentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// `INSERT ... ON CONFLICT DO NOTHING` on any executor. Payment review runs it
/// inside its verification transaction.
pub(super) async fn insert_if_absent<'e, X>(
    executor: X,
    new_enrollment: NewEnrollment,
) -> Result<Option<Enrollment>, AppError>
where
    X: PgExecutor<'e>,
{
    sqlx::query_as::<_, EnrollmentRow>(
        r#"
        INSERT INTO enrollments
            (id, user_id, course_id, payment_provider, payment_reference, amount_paid, currency)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, course_id) DO NOTHING
        RETURNING id, user_id, course_id, enrolled_at,
                  payment_provider, payment_reference, amount_paid, currency
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_enrollment.user_id)
    .bind(new_enrollment.course_id)
    .bind(new_enrollment.payment_provider.map(|p| p.as_str()))
    .bind(new_enrollment.payment_reference)
    .bind(new_enrollment.amount_paid)
    .bind(new_enrollment.currency)
    .fetch_optional(executor)
    .await?
    .map(TryInto::try_into)
    .transpose()
}

#[async_trait]
impl EnrollmentRepository for PgEnrollmentRepository {
    async fn find(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Enrollment>, AppError> {
        sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, user_id, course_id, enrolled_at,
                   payment_provider, payment_reference, amount_paid, currency
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    /// Inserts the enrollment unless one already exists for the pair.
    ///
    /// Returns `None` when the row was already there.
    async fn create_if_absent(
        &self,
        new_enrollment: NewEnrollment,
    ) -> Result<Option<Enrollment>, AppError> {
        insert_if_absent(self.pool.as_ref(), new_enrollment).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, AppError> {
        sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, user_id, course_id, enrolled_at,
                   payment_provider, payment_reference, amount_paid, currency
            FROM enrollments
            WHERE user_id = $1
            ORDER BY enrolled_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect()
    }
}

//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{AnalyticsRepository, NewAnalyticsEvent};
use crate::error::AppError;

/// Append-only store for product analytics events.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn record(&self, event: NewAnalyticsEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO analytics_events (name, user_id, course_id, properties)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.name)
        .bind(event.user_id)
        .bind(event.course_id)
        .bind(event.properties)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}

//! Repository trait for product analytics events.

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// An analytics event to persist.
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
    pub name: String,
    pub user_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub properties: Value,
}

/// Append-only sink for analytics events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn record(&self, event: NewAnalyticsEvent) -> Result<(), AppError>;
}

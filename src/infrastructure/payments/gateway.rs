//! Payment gateway abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PaymentGatewayError {
    #[error("Payment provider is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment provider error: {error_type} - {message}")]
    Api {
        error_type: String,
        message: String,
        code: Option<String>,
    },

    #[error("Payment provider returned a session without a checkout URL")]
    MissingUrl,
}

/// Everything needed to open a hosted checkout for one course.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub course_id: Uuid,
    pub course_title: String,
    pub course_description: String,
    pub user_id: Uuid,
    pub customer_email: String,
    /// Price in minor currency units.
    pub unit_amount: i64,
    /// ISO 4217 code, lower-case.
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub expires_at: DateTime<Utc>,
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError>;

    /// Returns true if an API key is configured.
    fn is_configured(&self) -> bool;
}

//! Stripe API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentGatewayError};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    #[serde(default)]
    message: String,
    code: Option<String>,
}

/// Stripe REST client for Checkout sessions.
///
/// Without an API key every call fails with
/// [`PaymentGatewayError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl StripeClient {
    /// Creates a client against `base_url` (normally [`DEFAULT_API_BASE`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, PaymentGatewayError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentGatewayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        match response.json::<StripeErrorResponse>().await {
            Ok(body) => Err(PaymentGatewayError::Api {
                error_type: body.error.error_type,
                message: body.error.message,
                code: body.error.code,
            }),
            Err(_) => Err(PaymentGatewayError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PaymentGatewayError::NotConfigured)?;

        let params = [
            ("mode", "payment".to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("customer_email", request.customer_email),
            ("line_items[0][price_data][currency]", request.currency),
            (
                "line_items[0][price_data][unit_amount]",
                request.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.course_title.clone(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                request.course_description,
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[course_id]", request.course_id.to_string()),
            ("metadata[user_id]", request.user_id.to_string()),
            ("metadata[course_title]", request.course_title),
            ("expires_at", request.expires_at.timestamp().to_string()),
        ];

        tracing::debug!(
            course_id = %request.course_id,
            user_id = %request.user_id,
            unit_amount = request.unit_amount,
            "Creating Stripe checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.base_url))
            .basic_auth(api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        let session: CheckoutSession = Self::handle_response(response).await?;
        if session.url.is_none() {
            return Err(PaymentGatewayError::MissingUrl);
        }

        Ok(session)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            course_id: Uuid::nil(),
            course_title: "Rust for Beginners".to_string(),
            course_description: "Learn Rust".to_string(),
            user_id: Uuid::nil(),
            customer_email: "student@example.com".to_string(),
            unit_amount: 4999,
            currency: "usd".to_string(),
            success_url: "https://app/courses/x?payment=success".to_string(),
            cancel_url: "https://app/courses/x?payment=cancelled".to_string(),
            expires_at: Utc.timestamp_opt(1_900_000_000, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_checkout_session_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkout/sessions"))
            .and(header_exists("authorization"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("unit_amount%5D=4999"))
            .and(body_string_contains("expires_at=1900000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cs_test_123",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = StripeClient::new(Some("sk_test".to_string()), server.uri()).unwrap();
        let session = client.create_checkout_session(request()).await.unwrap();

        assert_eq!(session.id, "cs_test_123");
        assert_eq!(
            session.url.as_deref(),
            Some("https://checkout.stripe.com/c/pay/cs_test_123")
        );
    }

    #[tokio::test]
    async fn test_api_error_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Invalid currency",
                    "code": "parameter_invalid"
                }
            })))
            .mount(&server)
            .await;

        let client = StripeClient::new(Some("sk_test".to_string()), server.uri()).unwrap();
        let err = client.create_checkout_session(request()).await.unwrap_err();

        match err {
            PaymentGatewayError::Api {
                error_type, code, ..
            } => {
                assert_eq!(error_type, "invalid_request_error");
                assert_eq!(code.as_deref(), Some("parameter_invalid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_without_request() {
        let client = StripeClient::new(None, DEFAULT_API_BASE).unwrap();
        assert!(!client.is_configured());

        let err = client.create_checkout_session(request()).await.unwrap_err();
        assert!(matches!(err, PaymentGatewayError::NotConfigured));
    }
}

//! Handler for Stripe webhook deliveries.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};

use crate::api::dto::payment::WebhookAck;
use crate::error::AppError;
use crate::state::AppState;

const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// Receives a Stripe event and reconciles completed checkouts into
/// enrollments.
///
/// # Endpoint
///
/// `POST /api/webhooks/stripe`
///
/// The body is taken as raw bytes: the signature covers the exact payload,
/// so it must be verified before any JSON parsing.
///
/// # Response
///
/// `200 {"received": true}` for every verified event, including duplicates
/// and event types that are ignored.
///
/// # Errors
///
/// - **400** missing, malformed, stale or mismatched signature; unparseable
///   payload; paid session without usable metadata
/// - **500** webhook secret not configured, or a database failure
pub async fn stripe_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state
        .webhook_service
        .handle_stripe_event(&body, signature)
        .await?;

    tracing::debug!(?outcome, "Stripe webhook processed");

    Ok(Json(WebhookAck::received()))
}

//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: no component reports `error`
/// - **503 Service Unavailable**: one or more components failed
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` on the pool
/// 2. **Notification queue**: channel open, free capacity
/// 3. **Storage**: proof directory writable
/// 4. **Payments**: Stripe key and webhook secret configured (`disabled` otherwise)
/// 5. **Email**: API key configured (`disabled` otherwise)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "notification_queue": { "status": "ok", "message": "Capacity: 1000" },
///     "storage": { "status": "ok", "message": "Writable" },
///     "payments": { "status": "disabled", "message": "Stripe is not configured" },
///     "email": { "status": "ok", "message": "Delivery enabled" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let checks = HealthChecks {
        database: check_database(&state).await,
        notification_queue: check_notification_queue(&state),
        storage: check_storage(&state).await,
        payments: check_payments(&state),
        email: check_email(&state),
    };

    let all_healthy = checks.all_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query("SELECT 1").execute(state.db.as_ref()).await {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unreachable");
            CheckStatus::error("Database unreachable")
        }
    }
}

fn check_notification_queue(state: &AppState) -> CheckStatus {
    if state.notifier.is_running() {
        CheckStatus::ok(format!(
            "Capacity: {}",
            state.notifier.available_capacity()
        ))
    } else {
        CheckStatus::error("Notification queue is closed")
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    if state.storage.health_check().await {
        CheckStatus::ok("Writable")
    } else {
        CheckStatus::error("Proof storage is not writable")
    }
}

fn check_payments(state: &AppState) -> CheckStatus {
    match (
        state.gateway.is_configured(),
        state.webhook_service.is_configured(),
    ) {
        (true, true) => CheckStatus::ok("Checkout and webhooks configured"),
        (true, false) => CheckStatus::error("Checkout configured without a webhook secret"),
        (false, _) => CheckStatus::disabled("Stripe is not configured"),
    }
}

fn check_email(state: &AppState) -> CheckStatus {
    if state.mailer.is_enabled() {
        CheckStatus::ok("Delivery enabled")
    } else {
        CheckStatus::disabled("No email API key; messages are logged only")
    }
}

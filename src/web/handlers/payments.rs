//! Dashboard actions on a single manual payment.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RejectForm {
    pub reason: String,
}

/// `POST /dashboard/payments/{id}/verify`
pub async fn verify_form_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Redirect {
    match state.manual_payment_service.verify(&admin, id).await {
        Ok((_, Some(_))) => back_with("notice", "Payment verified and student enrolled"),
        Ok((_, None)) => back_with("notice", "Payment verified; student was already enrolled"),
        Err(e) => back_with("error", &e.to_string()),
    }
}

/// `POST /dashboard/payments/{id}/reject` (form field `reason`)
pub async fn reject_form_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Form(form): Form<RejectForm>,
) -> Redirect {
    let reason = form.reason.trim();
    if reason.is_empty() || reason.chars().count() > 500 {
        return back_with("error", "A rejection reason of 1-500 characters is required");
    }

    match state
        .manual_payment_service
        .reject(&admin, id, reason.to_string())
        .await
    {
        Ok(_) => back_with("notice", "Payment rejected"),
        Err(e) => back_with("error", &e.to_string()),
    }
}

/// Streams the uploaded proof with its original content type.
///
/// `GET /dashboard/payments/{id}/proof`
pub async fn proof_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (payment, bytes) = state.manual_payment_service.load_proof(id).await?;

    Ok((
        [
            (CONTENT_TYPE, payment.proof_content_type),
            (CACHE_CONTROL, "private, no-store".to_string()),
        ],
        bytes,
    ))
}

/// Redirects to the queue with a one-line message in the query string.
fn back_with(kind: &str, message: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("/dashboard?{kind}={encoded}"))
}

//! Handler for manual (offline) payment submission.

use axum::{
    Extension, Json,
    extract::{Multipart, State, multipart::MultipartError},
};
use serde_json::json;

use crate::api::dto::payment::{ManualPaymentForm, ManualPaymentResponse};
use crate::application::services::ProofUpload;
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

const PROOF_FIELD: &str = "proof";

/// Records an offline payment with its proof for admin verification.
///
/// # Endpoint
///
/// `POST /api/payments/manual` (`multipart/form-data`)
///
/// # Form Fields
///
/// - `course_id`, `amount`, `currency`, `payment_method`, `transaction_id` (required)
/// - `payer_account` (optional)
/// - `proof` (required file: JPEG, PNG, WebP or PDF)
///
/// # Response
///
/// ```json
/// { "payment_id": "...", "status": "pending_verification" }
/// ```
///
/// # Errors
///
/// - **400** missing/invalid fields or proof, own course, amount mismatch,
///   transaction id already used
/// - **404** course missing or not published
/// - **409** already enrolled
pub async fn submit_manual_payment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<ManualPaymentResponse>, AppError> {
    let mut form = ManualPaymentForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == PROOF_FIELD {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            form.proof = Some(ProofUpload {
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.set_text(&name, value);
        }
    }

    let payment = state
        .manual_payment_service
        .submit(&user, form.into_submission()?)
        .await?;

    Ok(Json(ManualPaymentResponse {
        payment_id: payment.id,
        status: payment.status,
    }))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::bad_request(
        "Invalid multipart form",
        json!({ "reason": e.body_text() }),
    )
}

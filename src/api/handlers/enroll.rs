//! Handlers for enrollment initiation and the student's enrollments.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use uuid::Uuid;

use crate::api::dto::enroll::{EnrollRequest, EnrollResponse, EnrollmentListResponse};
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Enrolls the current user in a course, or opens a checkout for it.
///
/// # Endpoint
///
/// `POST /api/courses/{id}/enroll`
///
/// # Request Body
///
/// Optional for free courses:
///
/// ```json
/// { "amount": 49.99, "currency": "USD" }
/// ```
///
/// # Response
///
/// Free course:
///
/// ```json
/// { "enrollment": { "id": "...", ... }, "redirect_url": "/courses/{id}" }
/// ```
///
/// Paid course:
///
/// ```json
/// { "payment_url": "https://checkout.stripe.com/...", "session_id": "cs_..." }
/// ```
///
/// # Errors
///
/// - **404** course missing or not published
/// - **409** already enrolled
/// - **400** malformed JSON body, own course, or amount/currency mismatch
/// - **402** checkout could not be created
pub async fn enroll_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(course_id): Path<Uuid>,
    body: Result<Option<Json<EnrollRequest>>, JsonRejection>,
) -> Result<Json<EnrollResponse>, AppError> {
    let request = body?.map(|Json(b)| b).unwrap_or_default();

    let outcome = state
        .enrollment_service
        .enroll(&user, course_id, request.amount, request.currency)
        .await?;

    Ok(Json(outcome.into()))
}

/// Lists the current user's enrollments, newest first.
///
/// # Endpoint
///
/// `GET /api/enrollments`
pub async fn list_enrollments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<EnrollmentListResponse>, AppError> {
    let items = state.enrollment_service.list_for_user(user.id).await?;
    Ok(Json(EnrollmentListResponse { items }))
}

//! Admin handlers: manual payment review and course review.
//!
//! Mounted behind [`crate::api::middleware::auth::require_admin`].

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::course::{CourseResponse, RejectRequest};
use crate::api::dto::pagination::{Paginated, PaginationMeta, PaymentListParams};
use crate::api::dto::payment::PaymentReviewResponse;
use crate::domain::entities::{CurrentUser, Payment, PaymentStatus};
use crate::error::AppError;
use crate::state::AppState;

/// Lists manual payments by status, oldest first.
///
/// # Endpoint
///
/// `GET /api/admin/payments?status=pending_verification&page=1&page_size=25`
pub async fn list_payments_handler(
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<Paginated<Payment>>, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;
    let status = params.status.unwrap_or(PaymentStatus::PendingVerification);

    let (items, total) = state
        .manual_payment_service
        .list(status, offset, limit)
        .await?;

    Ok(Json(Paginated {
        pagination: PaginationMeta::new(&params.pagination, total),
        items,
    }))
}

/// Verifies a pending manual payment and enrolls the payer.
///
/// # Endpoint
///
/// `POST /api/admin/payments/{id}/verify`
///
/// # Errors
///
/// - **404** unknown payment
/// - **409** payment already reviewed
pub async fn verify_payment_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentReviewResponse>, AppError> {
    let (payment, enrollment) = state.manual_payment_service.verify(&admin, id).await?;

    Ok(Json(PaymentReviewResponse {
        payment,
        enrollment_id: enrollment.map(|e| e.id),
    }))
}

/// Rejects a pending manual payment.
///
/// # Endpoint
///
/// `POST /api/admin/payments/{id}/reject` with `{"reason": "..."}`
pub async fn reject_payment_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> Result<Json<PaymentReviewResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let payment = state
        .manual_payment_service
        .reject(&admin, id, payload.reason)
        .await?;

    Ok(Json(PaymentReviewResponse {
        payment,
        enrollment_id: None,
    }))
}

/// Publishes a course under review.
///
/// # Endpoint
///
/// `POST /api/admin/courses/{id}/approve`
pub async fn approve_course_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state.course_service.approve(id).await?;
    Ok(Json(course.into()))
}

/// Returns a course under review to its instructor.
///
/// # Endpoint
///
/// `POST /api/admin/courses/{id}/reject` with `{"reason": "..."}`
pub async fn reject_course_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> Result<Json<CourseResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let course = state.course_service.reject(id, payload.reason).await?;
    Ok(Json(course.into()))
}

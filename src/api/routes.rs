//! API route configuration.
//!
//! Routes are grouped by the authentication they need; the groups are
//! layered and nested under `/api` in [`crate::routes::app_router`].

use crate::api::handlers::{
    approve_course_handler, create_course_handler, enroll_handler, get_course_handler,
    list_courses_handler, list_enrollments_handler, list_payments_handler,
    reject_course_handler, reject_payment_handler, stripe_webhook_handler,
    submit_course_handler, submit_manual_payment_handler, verify_payment_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Catalog routes; a bearer token is optional.
///
/// # Endpoints
///
/// - `GET /courses`       - Published catalog (paginated)
/// - `GET /courses/{id}`  - One course (unpublished ones only for owner/admin)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses_handler))
        .route("/courses/{id}", get(get_course_handler))
}

/// Routes for any signed-in user.
///
/// # Endpoints
///
/// - `POST /courses`               - Create a draft course (instructor/admin)
/// - `POST /courses/{id}/submit`   - Submit a course for review (owner)
/// - `POST /courses/{id}/enroll`   - Enroll, or open a Stripe checkout
/// - `GET  /enrollments`           - Current user's enrollments
/// - `POST /payments/manual`       - Submit an offline payment with proof
///
/// `proof_body_limit` caps the multipart body of the manual payment route.
pub fn protected_routes(proof_body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/courses", post(create_course_handler))
        .route("/courses/{id}/submit", post(submit_course_handler))
        .route("/courses/{id}/enroll", post(enroll_handler))
        .route("/enrollments", get(list_enrollments_handler))
        .route(
            "/payments/manual",
            post(submit_manual_payment_handler).layer(DefaultBodyLimit::max(proof_body_limit)),
        )
}

/// Admin-only routes.
///
/// # Endpoints
///
/// - `GET  /admin/payments`               - Manual payments by status
/// - `POST /admin/payments/{id}/verify`   - Verify and enroll
/// - `POST /admin/payments/{id}/reject`   - Reject with a reason
/// - `POST /admin/courses/{id}/approve`   - Publish a course under review
/// - `POST /admin/courses/{id}/reject`    - Reject a course under review
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/payments", get(list_payments_handler))
        .route("/admin/payments/{id}/verify", post(verify_payment_handler))
        .route("/admin/payments/{id}/reject", post(reject_payment_handler))
        .route("/admin/courses/{id}/approve", post(approve_course_handler))
        .route("/admin/courses/{id}/reject", post(reject_course_handler))
}

/// Provider callbacks, authenticated by signature instead of a session.
///
/// # Endpoints
///
/// - `POST /webhooks/stripe` - Stripe event delivery
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/stripe", post(stripe_webhook_handler))
}

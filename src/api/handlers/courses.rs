//! Handlers for the course catalog and instructor drafts.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::course::{CourseResponse, CreateCourseRequest};
use crate::api::dto::pagination::{Paginated, PaginationMeta, PaginationParams};
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_CURRENCY: &str = "USD";

/// Lists published courses, newest first.
///
/// # Endpoint
///
/// `GET /api/courses?page=1&page_size=25`
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_courses_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<CourseResponse>>, AppError> {
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (courses, total) = state.course_service.list_published(offset, limit).await?;

    Ok(Json(Paginated {
        pagination: PaginationMeta::new(&params, total),
        items: courses.into_iter().map(CourseResponse::from).collect(),
    }))
}

/// Returns one course.
///
/// # Endpoint
///
/// `GET /api/courses/{id}`
///
/// Unpublished courses are visible only to their instructor and to admins;
/// for anyone else they are a 404.
pub async fn get_course_handler(
    State(state): State<AppState>,
    viewer: Option<Extension<CurrentUser>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, AppError> {
    let viewer = viewer.map(|Extension(user)| user);
    let course = state.course_service.get_visible(id, viewer.as_ref()).await?;
    Ok(Json(course.into()))
}

/// Creates a draft course owned by the current user.
///
/// # Endpoint
///
/// `POST /api/courses`
///
/// # Request Body
///
/// ```json
/// { "title": "Intro to Amharic", "description": "...", "price": 1500, "currency": "ETB" }
/// ```
///
/// # Errors
///
/// - **400** invalid fields
/// - **403** the current user is a student
pub async fn create_course_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<Json<CourseResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let course = state
        .course_service
        .create(
            &user,
            payload.title,
            payload.description,
            payload.price,
            payload
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        )
        .await?;

    Ok(Json(course.into()))
}

/// Sends a draft or rejected course to admin review.
///
/// # Endpoint
///
/// `POST /api/courses/{id}/submit`
///
/// # Errors
///
/// - **403** not the course's instructor
/// - **409** course is not in `draft` or `rejected`
pub async fn submit_course_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = state.course_service.submit_for_review(&user, id).await?;
    Ok(Json(course.into()))
}

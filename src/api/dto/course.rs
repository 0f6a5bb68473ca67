//! DTOs for the course catalog and course review.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Course, CourseStatus};

/// ISO 4217 style three-letter code, any case.
static CURRENCY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}$").expect("valid currency regex"));

/// Request to create a draft course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    /// Major currency units; zero makes the course free.
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[validate(regex(path = "*CURRENCY_REGEX", message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

/// Admin rejection of a course or a manual payment.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// Course as returned by the API.
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub is_free: bool,
    pub instructor_id: Uuid,
    pub status: CourseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            is_free: course.is_free(),
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            currency: course.currency,
            instructor_id: course.instructor_id,
            status: course.status,
            rejection_reason: course.rejection_reason,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

//! Course entity and its review lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Review status of a course.
///
/// ```text
/// draft ──submit──▶ pending_review ──approve──▶ published
///   ▲                    │
///   └──── rejected ◀─────┘ reject   (rejected ──submit──▶ pending_review)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Draft,
    PendingReview,
    Published,
    Rejected,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if moving from `self` to `next` is an allowed review step.
    pub fn can_transition_to(&self, next: CourseStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::PendingReview)
                | (Self::Rejected, Self::PendingReview)
                | (Self::PendingReview, Self::Published)
                | (Self::PendingReview, Self::Rejected)
        )
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending_review" => Ok(Self::PendingReview),
            "published" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown course status: {other}")),
        }
    }
}

/// A course offered on the marketplace.
///
/// `price` is in major currency units; a price of zero makes the course free.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub instructor_id: Uuid,
    pub is_published: bool,
    pub status: CourseStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Returns true if students can see and enroll in the course.
    pub fn is_available(&self) -> bool {
        self.is_published && self.status == CourseStatus::Published
    }

    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.instructor_id == user_id
    }
}

/// Input data for creating a draft course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub instructor_id: Uuid,
}

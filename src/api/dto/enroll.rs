//! DTOs for enrollment initiation.

use serde::{Deserialize, Serialize};

use crate::application::services::EnrollOutcome;
use crate::domain::entities::Enrollment;

/// Body of `POST /api/courses/{id}/enroll`.
///
/// Both fields are ignored for free courses. For paid courses `amount` is
/// the price the client showed the student and must match the course price;
/// the check happens after the course lookup so a missing course is still a 404.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

/// Enrollment response; the shape depends on whether payment is needed.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EnrollResponse {
    Enrolled {
        enrollment: Enrollment,
        redirect_url: String,
    },
    Checkout {
        payment_url: String,
        session_id: String,
    },
}

impl From<EnrollOutcome> for EnrollResponse {
    fn from(outcome: EnrollOutcome) -> Self {
        match outcome {
            EnrollOutcome::Enrolled {
                enrollment,
                redirect_url,
            } => Self::Enrolled {
                enrollment,
                redirect_url,
            },
            EnrollOutcome::Checkout {
                payment_url,
                session_id,
            } => Self::Checkout {
                payment_url,
                session_id,
            },
        }
    }
}

/// Enrollments of the current user.
#[derive(Debug, Serialize)]
pub struct EnrollmentListResponse {
    pub items: Vec<Enrollment>,
}

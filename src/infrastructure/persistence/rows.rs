//! Row types shared by the PostgreSQL repositories.
//!
//! Enum-like columns are stored as text and parsed on the way out; an
//! unparseable value means the database was written outside this service.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entities::{Course, Enrollment, Payment, User};
use crate::error::AppError;

fn parse_column<T>(value: &str, column: &'static str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e: String| {
        tracing::error!(column, value, error = %e, "Invalid value in database column");
        AppError::internal("Corrupt database row", json!({ "column": column }))
    })
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: parse_column(&row.role, "users.role")?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub instructor_id: Uuid,
    pub is_published: bool,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = AppError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            currency: row.currency,
            instructor_id: row.instructor_id,
            is_published: row.is_published,
            status: parse_column(&row.status, "courses.status")?,
            rejection_reason: row.rejection_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct EnrollmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub payment_provider: Option<String>,
    pub payment_reference: Option<String>,
    pub amount_paid: Option<f64>,
    pub currency: Option<String>,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = AppError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let payment_provider = row
            .payment_provider
            .as_deref()
            .map(|p| parse_column(p, "enrollments.payment_provider"))
            .transpose()?;

        Ok(Enrollment {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            enrolled_at: row.enrolled_at,
            payment_provider,
            payment_reference: row.payment_reference,
            amount_paid: row.amount_paid,
            currency: row.currency,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub payer_account: Option<String>,
    pub transaction_id: String,
    pub proof_path: String,
    pub proof_content_type: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            amount: row.amount,
            currency: row.currency,
            payment_method: parse_column(&row.payment_method, "payments.payment_method")?,
            payer_account: row.payer_account,
            transaction_id: row.transaction_id,
            proof_path: row.proof_path,
            proof_content_type: row.proof_content_type,
            status: parse_column(&row.status, "payments.status")?,
            rejection_reason: row.rejection_reason,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
        })
    }
}

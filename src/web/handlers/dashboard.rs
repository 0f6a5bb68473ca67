//! Manual payment review queue.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{Payment, PaymentStatus};
use crate::error::AppError;
use crate::state::AppState;

/// One row of the review table, preformatted for display.
pub struct PaymentRow {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub amount: String,
    pub method: &'static str,
    pub payer_account: String,
    pub transaction_id: String,
    pub proof_content_type: String,
    pub submitted_at: String,
}

impl From<Payment> for PaymentRow {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.to_string(),
            user_id: p.user_id.to_string(),
            course_id: p.course_id.to_string(),
            amount: format!("{:.2} {}", p.amount, p.currency),
            method: p.payment_method.as_str(),
            payer_account: p.payer_account.unwrap_or_else(|| "-".to_string()),
            transaction_id: p.transaction_id,
            proof_content_type: p.proof_content_type,
            submitted_at: p.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Template for the pending payments page.
///
/// Renders `templates/payments.html`: one row per pending payment with a
/// proof link and verify/reject forms.
#[derive(Template, WebTemplate)]
#[template(path = "payments.html")]
pub struct PaymentsTemplate {
    pub payments: Vec<PaymentRow>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: i64,
    pub notice: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Renders the queue of payments awaiting verification, oldest first.
///
/// # Endpoint
///
/// `GET /dashboard?page=1`
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let (offset, limit) = params
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, serde_json::json!({})))?;

    let (payments, total) = state
        .manual_payment_service
        .list(PaymentStatus::PendingVerification, offset, limit)
        .await?;
    let meta = PaginationMeta::new(&params.pagination, total);

    Ok(PaymentsTemplate {
        payments: payments.into_iter().map(PaymentRow::from).collect(),
        page: meta.page,
        total_pages: meta.total_pages,
        total_items: meta.total_items,
        notice: params.notice,
        error: params.error,
    })
}

//! DTOs for manual payments, their review, and the Stripe webhook.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::application::services::{ManualPaymentSubmission, ProofUpload};
use crate::domain::entities::{ManualPaymentMethod, Payment, PaymentStatus};
use crate::error::AppError;

/// Response to a manual payment submission.
#[derive(Debug, Serialize)]
pub struct ManualPaymentResponse {
    pub payment_id: Uuid,
    pub status: PaymentStatus,
}

/// Result of an admin review action.
#[derive(Debug, Serialize)]
pub struct PaymentReviewResponse {
    pub payment: Payment,
    /// Set when verification created a new enrollment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<Uuid>,
}

/// Acknowledgement returned to Stripe for every accepted delivery.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Text fields of the manual payment multipart form, as received.
#[derive(Debug, Default)]
pub struct ManualPaymentForm {
    pub course_id: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub payer_account: Option<String>,
    pub transaction_id: Option<String>,
    pub proof: Option<ProofUpload>,
}

impl ManualPaymentForm {
    /// Records one text field; unknown fields are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "course_id" => &mut self.course_id,
            "amount" => &mut self.amount,
            "currency" => &mut self.currency,
            "payment_method" => &mut self.payment_method,
            "payer_account" => &mut self.payer_account,
            "transaction_id" => &mut self.transaction_id,
            _ => return,
        };
        *slot = Some(value.trim().to_string()).filter(|v| !v.is_empty());
    }

    /// Checks presence and shape of every field.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] naming the missing fields, or the first
    /// field that does not parse.
    pub fn into_submission(self) -> Result<ManualPaymentSubmission, AppError> {
        let Self {
            course_id: Some(course_id),
            amount: Some(amount),
            currency: Some(currency),
            payment_method: Some(payment_method),
            payer_account,
            transaction_id: Some(transaction_id),
            proof: Some(proof),
        } = self
        else {
            return Err(AppError::bad_request(
                "Missing required fields",
                json!({ "missing": self.missing_fields() }),
            ));
        };

        let course_id = Uuid::parse_str(&course_id).map_err(|_| invalid_field("course_id"))?;
        let amount = amount
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(|| invalid_field("amount"))?;
        let payment_method = payment_method.parse::<ManualPaymentMethod>().map_err(|_| {
            AppError::bad_request(
                "Unsupported payment method",
                json!({
                    "field": "payment_method",
                    "allowed": ManualPaymentMethod::ALL.map(|m| m.as_str()),
                }),
            )
        })?;

        Ok(ManualPaymentSubmission {
            course_id,
            amount,
            currency,
            payment_method,
            payer_account,
            transaction_id,
            proof,
        })
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("course_id", self.course_id.is_none()),
            ("amount", self.amount.is_none()),
            ("currency", self.currency.is_none()),
            ("payment_method", self.payment_method.is_none()),
            ("transaction_id", self.transaction_id.is_none()),
            ("proof", self.proof.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

fn invalid_field(field: &str) -> AppError {
    AppError::bad_request(format!("Invalid {field}"), json!({ "field": field }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> ManualPaymentForm {
        let mut form = ManualPaymentForm::default();
        form.set_text("course_id", Uuid::new_v4().to_string());
        form.set_text("amount", "1500.00".into());
        form.set_text("currency", "ETB".into());
        form.set_text("payment_method", "telebirr".into());
        form.set_text("transaction_id", " TXN-1 ".into());
        form.proof = Some(ProofUpload {
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        });
        form
    }

    #[test]
    fn test_complete_form_converts() {
        let submission = complete_form().into_submission().unwrap();
        assert_eq!(submission.amount, 1500.0);
        assert_eq!(submission.payment_method, ManualPaymentMethod::Telebirr);
        assert_eq!(submission.transaction_id, "TXN-1");
        assert!(submission.payer_account.is_none());
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut form = complete_form();
        form.proof = None;
        form.set_text("amount", "   ".into());

        let err = form.into_submission().unwrap_err();
        let info = err.to_error_info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["missing"], json!(["amount", "proof"]));
    }

    #[test]
    fn test_unknown_method_lists_allowed() {
        let mut form = complete_form();
        form.set_text("payment_method", "paypal".into());

        let info = form.into_submission().unwrap_err().to_error_info();
        assert_eq!(info.details["field"], "payment_method");
        assert!(
            info.details["allowed"]
                .as_array()
                .unwrap()
                .contains(&json!("cbe_birr"))
        );
    }

    #[test]
    fn test_non_numeric_amount_rejected() {
        let mut form = complete_form();
        form.set_text("amount", "fifteen".into());
        let info = form.into_submission().unwrap_err().to_error_info();
        assert_eq!(info.details["field"], "amount");
    }

    #[test]
    fn test_bad_course_id_rejected() {
        let mut form = complete_form();
        form.set_text("course_id", "42".into());
        let info = form.into_submission().unwrap_err().to_error_info();
        assert_eq!(info.details["field"], "course_id");
    }
}

//! Repository trait for manual payment records.

use crate::domain::entities::{Enrollment, ManualPaymentMethod, NewPayment, Payment, PaymentStatus};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for manual payments.
///
/// `(transaction_id, payment_method)` is unique at the database level.
///
/// # Examples
///
/// See integration tests: `tests/repository_payment.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Records a payment with status `pending_verification`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the transaction id was already used
    /// for the same payment method.
    async fn create(&self, new_payment: NewPayment) -> Result<Payment, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, AppError>;

    /// Returns true if a payment with this transaction id and method exists.
    async fn transaction_exists(
        &self,
        transaction_id: &str,
        payment_method: ManualPaymentMethod,
    ) -> Result<bool, AppError>;

    /// Lists payments in `status`, oldest first (review queue order).
    async fn list_by_status(
        &self,
        status: PaymentStatus,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Payment>, AppError>;

    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64, AppError>;

    /// Records a review outcome.
    ///
    /// Only applies to payments still in `pending_verification`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Payment))` with the reviewed payment
    /// - `Ok(None)` if the payment does not exist or was already reviewed
    async fn mark_reviewed(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reviewer_id: Uuid,
        rejection_reason: Option<String>,
    ) -> Result<Option<Payment>, AppError>;

    /// Verifies a pending payment and enrolls its payer in one transaction.
    ///
    /// If the enrollment insert fails, the payment stays
    /// `pending_verification` and the review can be retried.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((payment, Some(enrollment))))` when the payer was enrolled
    /// - `Ok(Some((payment, None)))` when the payer was already enrolled
    /// - `Ok(None)` if the payment does not exist or was already reviewed
    async fn verify_and_enroll(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<(Payment, Option<Enrollment>)>, AppError>;
}

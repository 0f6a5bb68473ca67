//! PostgreSQL implementation of manual payment repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::pg_enrollment_repository::insert_if_absent;
use super::rows::PaymentRow;
use crate::domain::entities::{
    Enrollment, ManualPaymentMethod, NewEnrollment, NewPayment, Payment, PaymentProvider,
    PaymentStatus,
};
use crate::domain::repositories::PaymentRepository;
use crate::error::AppError;

const PAYMENT_COLUMNS: &str = "id, user_id, course_id, amount, currency, payment_method, \
     payer_account, transaction_id, proof_path, proof_content_type, status, \
     rejection_reason, reviewed_by, reviewed_at, created_at";

/// PostgreSQL repository for manual payment records.
///
/// A transaction id can be used once per payment method
/// (`payments_transaction_method_key`).
pub struct PgPaymentRepository {
    pool: Arc<PgPool>,
}

impl PgPaymentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create(&self, new_payment: NewPayment) -> Result<Payment, AppError> {
        let sql = format!(
            "INSERT INTO payments \
                (id, user_id, course_id, amount, currency, payment_method, payer_account, \
                 transaction_id, proof_path, proof_content_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {PAYMENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(new_payment.id)
            .bind(new_payment.user_id)
            .bind(new_payment.course_id)
            .bind(new_payment.amount)
            .bind(new_payment.currency)
            .bind(new_payment.payment_method.as_str())
            .bind(new_payment.payer_account)
            .bind(new_payment.transaction_id)
            .bind(new_payment.proof_path)
            .bind(new_payment.proof_content_type)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, AppError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");

        sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn transaction_exists(
        &self,
        transaction_id: &str,
        payment_method: ManualPaymentMethod,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM payments
                WHERE transaction_id = $1 AND payment_method = $2
            )
            "#,
        )
        .bind(transaction_id)
        .bind(payment_method.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list_by_status(
        &self,
        status: PaymentStatus,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Payment>, AppError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE status = $1 \
             ORDER BY created_at ASC \
             OFFSET $2 LIMIT $3"
        );

        sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(status.as_str())
            .bind(offset)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    /// Records a review outcome. Only pending payments are updated; returns
    /// `None` if the payment is missing or was already reviewed.
    async fn mark_reviewed(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reviewer_id: Uuid,
        rejection_reason: Option<String>,
    ) -> Result<Option<Payment>, AppError> {
        let sql = format!(
            "UPDATE payments \
             SET status = $2, reviewed_by = $3, reviewed_at = NOW(), rejection_reason = $4 \
             WHERE id = $1 AND status = 'pending_verification' \
             RETURNING {PAYMENT_COLUMNS}"
        );

        sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(reviewer_id)
            .bind(rejection_reason)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn verify_and_enroll(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<(Payment, Option<Enrollment>)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE payments \
             SET status = 'verified', reviewed_by = $2, reviewed_at = NOW(), \
                 rejection_reason = NULL \
             WHERE id = $1 AND status = 'pending_verification' \
             RETURNING {PAYMENT_COLUMNS}"
        );

        let Some(row) = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id)
            .bind(reviewer_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };
        let payment: Payment = row.try_into()?;

        // Dropping `tx` on error rolls the status change back.
        let enrollment = insert_if_absent(
            &mut *tx,
            NewEnrollment::paid(
                payment.user_id,
                payment.course_id,
                PaymentProvider::Manual,
                payment.transaction_id.clone(),
                Some(payment.amount),
                Some(payment.currency.clone()),
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(Some((payment, enrollment)))
    }
}

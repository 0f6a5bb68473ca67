//! Manual (offline) payment submission and admin review.

use std::sync::Arc;

use crate::application::services::enrollment_service::{ensure_can_enroll, load_available_course};
use crate::domain::enrollment_event::{EnrollmentEvent, EnrollmentNotifier, EnrollmentSource};
use crate::domain::entities::{
    CurrentUser, Enrollment, ManualPaymentMethod, NewPayment, Payment, PaymentStatus,
};
use crate::domain::repositories::{
    CourseRepository, EnrollmentRepository, PaymentRepository, UserRepository,
};
use crate::error::AppError;
use crate::infrastructure::storage::{ProofStorage, StorageError};
use crate::utils::db_error::is_unique_violation_on;
use crate::utils::money::{amounts_match, currencies_match};
use serde_json::json;
use uuid::Uuid;

const TRANSACTION_CONSTRAINT: &str = "payments_transaction_method_key";
const MAX_REFERENCE_LEN: usize = 100;

/// Proof file types accepted, with the extension used in storage.
const ALLOWED_PROOF_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
];

/// An uploaded proof file.
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A parsed manual payment form.
#[derive(Debug, Clone)]
pub struct ManualPaymentSubmission {
    pub course_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub payment_method: ManualPaymentMethod,
    pub payer_account: Option<String>,
    pub transaction_id: String,
    pub proof: ProofUpload,
}

/// Maps an upload content type to its storage extension.
pub fn proof_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    ALLOWED_PROOF_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

pub struct ManualPaymentService<C, E, P, U>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: PaymentRepository,
    U: UserRepository,
{
    course_repository: Arc<C>,
    enrollment_repository: Arc<E>,
    payment_repository: Arc<P>,
    user_repository: Arc<U>,
    storage: Arc<dyn ProofStorage>,
    notifier: EnrollmentNotifier,
    max_proof_bytes: usize,
}

impl<C, E, P, U> ManualPaymentService<C, E, P, U>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    P: PaymentRepository,
    U: UserRepository,
{
    pub fn new(
        course_repository: Arc<C>,
        enrollment_repository: Arc<E>,
        payment_repository: Arc<P>,
        user_repository: Arc<U>,
        storage: Arc<dyn ProofStorage>,
        notifier: EnrollmentNotifier,
        max_proof_bytes: usize,
    ) -> Self {
        Self {
            course_repository,
            enrollment_repository,
            payment_repository,
            user_repository,
            storage,
            notifier,
            max_proof_bytes,
        }
    }

    /// Records a manual payment for admin verification.
    ///
    /// Validation order: form fields and proof file, course availability
    /// (404), existing enrollment (409), self-enrollment (400), amount and
    /// currency against the course (400), transaction id reuse (400).
    ///
    /// The proof is stored first and the record inserted second; if the
    /// insert fails the stored proof is removed again.
    pub async fn submit(
        &self,
        user: &CurrentUser,
        submission: ManualPaymentSubmission,
    ) -> Result<Payment, AppError> {
        let extension = self.validate_submission(&submission)?;

        let course =
            load_available_course(self.course_repository.as_ref(), submission.course_id).await?;
        ensure_can_enroll(self.enrollment_repository.as_ref(), user.id, &course).await?;

        if course.is_free() {
            return Err(AppError::bad_request(
                "This course is free and does not require payment",
                json!({ "course_id": course.id }),
            ));
        }

        if !amounts_match(submission.amount, course.price) {
            return Err(AppError::bad_request(
                "Amount does not match course price",
                json!({ "expected_amount": course.price, "received_amount": submission.amount }),
            ));
        }

        if !currencies_match(&submission.currency, &course.currency) {
            return Err(AppError::bad_request(
                "Currency does not match course currency",
                json!({
                    "expected_currency": course.currency,
                    "received_currency": submission.currency.trim(),
                }),
            ));
        }

        let transaction_id = submission.transaction_id.trim().to_string();
        if self
            .payment_repository
            .transaction_exists(&transaction_id, submission.payment_method)
            .await?
        {
            return Err(duplicate_transaction(&transaction_id, submission.payment_method));
        }

        let payment_id = Uuid::new_v4();
        let proof_path = format!(
            "payment-proofs/{}/{}/{}.{}",
            user.id,
            course.id,
            Uuid::new_v4(),
            extension
        );

        self.storage
            .put(&proof_path, submission.proof.bytes)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = %proof_path, "Failed to store payment proof");
                AppError::internal("Failed to store payment proof", json!({}))
            })?;

        let new_payment = NewPayment {
            id: payment_id,
            user_id: user.id,
            course_id: course.id,
            amount: submission.amount,
            currency: submission.currency.trim().to_ascii_uppercase(),
            payment_method: submission.payment_method,
            payer_account: submission
                .payer_account
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            transaction_id: transaction_id.clone(),
            proof_path: proof_path.clone(),
            proof_content_type: submission.proof.content_type,
        };

        let payment = match self.payment_repository.create(new_payment).await {
            Ok(payment) => payment,
            Err(e) => {
                if let Err(remove_err) = self.storage.remove(&proof_path).await {
                    tracing::error!(
                        error = %remove_err,
                        path = %proof_path,
                        "Failed to remove orphaned payment proof"
                    );
                }

                if is_unique_violation_on(&e, TRANSACTION_CONSTRAINT) {
                    return Err(duplicate_transaction(&transaction_id, submission.payment_method));
                }
                return Err(e);
            }
        };

        tracing::info!(
            payment_id = %payment.id,
            user_id = %user.id,
            course_id = %course.id,
            method = %payment.payment_method,
            "Manual payment submitted"
        );

        Ok(payment)
    }

    /// Lists payments in `status`, oldest first, with the total count.
    pub async fn list(
        &self,
        status: PaymentStatus,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Payment>, i64), AppError> {
        let payments = self
            .payment_repository
            .list_by_status(status, offset, limit)
            .await?;
        let total = self.payment_repository.count_by_status(status).await?;
        Ok((payments, total))
    }

    /// Marks a pending payment verified and enrolls the payer.
    ///
    /// Both writes commit together, so a failed enrollment leaves the
    /// payment pending for another attempt.
    ///
    /// Returns the enrollment when one was created; `None` means the payer
    /// was already enrolled.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown payment
    /// - [`AppError::Conflict`] if the payment is no longer pending
    pub async fn verify(
        &self,
        reviewer: &CurrentUser,
        payment_id: Uuid,
    ) -> Result<(Payment, Option<Enrollment>), AppError> {
        self.find_pending(payment_id).await?;

        let (payment, enrollment) = self
            .payment_repository
            .verify_and_enroll(payment_id, reviewer.id)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    payment_id = %payment_id,
                    error = %e,
                    "Payment verification failed, payment left pending"
                );
            })?
            .ok_or_else(|| already_reviewed(payment_id))?;

        tracing::info!(
            payment_id = %payment.id,
            reviewer_id = %reviewer.id,
            enrolled = enrollment.is_some(),
            "Manual payment verified"
        );

        if let Some(enrollment) = &enrollment {
            self.notify(enrollment).await;
        }

        Ok((payment, enrollment))
    }

    /// Marks a pending payment rejected with a reason.
    pub async fn reject(
        &self,
        reviewer: &CurrentUser,
        payment_id: Uuid,
        reason: String,
    ) -> Result<Payment, AppError> {
        self.find_pending(payment_id).await?;

        let payment = self
            .payment_repository
            .mark_reviewed(
                payment_id,
                PaymentStatus::Rejected,
                reviewer.id,
                Some(reason.trim().to_string()),
            )
            .await?
            .ok_or_else(|| already_reviewed(payment_id))?;

        tracing::info!(payment_id = %payment.id, reviewer_id = %reviewer.id, "Manual payment rejected");
        Ok(payment)
    }

    /// Fetches a payment with its stored proof file.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] if the payment or its proof is missing.
    pub async fn load_proof(&self, payment_id: Uuid) -> Result<(Payment, Vec<u8>), AppError> {
        let payment = self.find(payment_id).await?;

        let bytes = self
            .storage
            .get(&payment.proof_path)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => AppError::not_found(
                    "Payment proof not found",
                    json!({ "payment_id": payment_id }),
                ),
                other => {
                    tracing::error!(payment_id = %payment_id, error = %other, "Failed to read payment proof");
                    AppError::internal("Failed to read payment proof", json!({}))
                }
            })?;

        Ok((payment, bytes))
    }

    fn validate_submission(
        &self,
        submission: &ManualPaymentSubmission,
    ) -> Result<&'static str, AppError> {
        let transaction_id = submission.transaction_id.trim();
        if transaction_id.is_empty() || transaction_id.len() > MAX_REFERENCE_LEN {
            return Err(AppError::bad_request(
                "Transaction ID is required (max 100 characters)",
                json!({ "field": "transaction_id" }),
            ));
        }

        if submission
            .payer_account
            .as_deref()
            .is_some_and(|a| a.trim().len() > MAX_REFERENCE_LEN)
        {
            return Err(AppError::bad_request(
                "Payer account is too long (max 100 characters)",
                json!({ "field": "payer_account" }),
            ));
        }

        if !submission.amount.is_finite() || submission.amount <= 0.0 {
            return Err(AppError::bad_request(
                "Amount must be a positive number",
                json!({ "field": "amount" }),
            ));
        }

        let currency = submission.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::bad_request(
                "Currency must be a 3-letter ISO code",
                json!({ "field": "currency" }),
            ));
        }

        let proof = &submission.proof;
        if proof.bytes.is_empty() {
            return Err(AppError::bad_request(
                "Payment proof file is empty",
                json!({ "field": "proof" }),
            ));
        }
        if proof.bytes.len() > self.max_proof_bytes {
            return Err(AppError::bad_request(
                "Payment proof file is too large",
                json!({ "field": "proof", "max_bytes": self.max_proof_bytes }),
            ));
        }

        proof_extension(&proof.content_type).ok_or_else(|| {
            AppError::bad_request(
                "Unsupported proof file type",
                json!({
                    "field": "proof",
                    "content_type": proof.content_type,
                    "allowed": ALLOWED_PROOF_TYPES.iter().map(|(m, _)| *m).collect::<Vec<_>>(),
                }),
            )
        })
    }

    async fn find(&self, payment_id: Uuid) -> Result<Payment, AppError> {
        self.payment_repository
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Payment not found", json!({ "payment_id": payment_id }))
            })
    }

    async fn find_pending(&self, payment_id: Uuid) -> Result<Payment, AppError> {
        let payment = self.find(payment_id).await?;

        if !payment.is_pending() {
            return Err(already_reviewed(payment_id));
        }

        Ok(payment)
    }

    async fn notify(&self, enrollment: &Enrollment) {
        let course_title = match self.course_repository.find_by_id(enrollment.course_id).await {
            Ok(Some(course)) => course.title,
            _ => "your course".to_string(),
        };

        let mut event = EnrollmentEvent::new(enrollment, course_title, EnrollmentSource::Manual);
        match self.user_repository.find_by_id(enrollment.user_id).await {
            Ok(Some(user)) => event = event.with_recipient(user.email, user.full_name),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "User lookup failed, skipping email"),
        }

        self.notifier.notify(event);
    }
}

fn duplicate_transaction(transaction_id: &str, method: ManualPaymentMethod) -> AppError {
    AppError::bad_request(
        "This transaction ID has already been submitted",
        json!({ "transaction_id": transaction_id, "payment_method": method }),
    )
}

fn already_reviewed(payment_id: Uuid) -> AppError {
    AppError::conflict(
        "Payment has already been reviewed",
        json!({ "payment_id": payment_id }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Course, CourseStatus, PaymentProvider, UserRole};
    use crate::domain::repositories::{
        MockCourseRepository, MockEnrollmentRepository, MockPaymentRepository, MockUserRepository,
    };
    use crate::infrastructure::storage::MockProofStorage;
    use chrono::Utc;
    use tokio::sync::mpsc;

    type Service = ManualPaymentService<
        MockCourseRepository,
        MockEnrollmentRepository,
        MockPaymentRepository,
        MockUserRepository,
    >;

    struct Mocks {
        courses: MockCourseRepository,
        enrollments: MockEnrollmentRepository,
        payments: MockPaymentRepository,
        users: MockUserRepository,
        storage: MockProofStorage,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                courses: MockCourseRepository::new(),
                enrollments: MockEnrollmentRepository::new(),
                payments: MockPaymentRepository::new(),
                users: MockUserRepository::new(),
                storage: MockProofStorage::new(),
            }
        }

        fn with_course(mut self, course: Course) -> Self {
            self.courses
                .expect_find_by_id()
                .returning(move |_| Ok(Some(course.clone())));
            self
        }

        fn not_enrolled(mut self) -> Self {
            self.enrollments.expect_find().returning(|_, _| Ok(None));
            self
        }

        fn build(self) -> (Service, mpsc::Receiver<EnrollmentEvent>) {
            let (notifier, rx) = EnrollmentNotifier::channel(8);
            let service = ManualPaymentService::new(
                Arc::new(self.courses),
                Arc::new(self.enrollments),
                Arc::new(self.payments),
                Arc::new(self.users),
                Arc::new(self.storage),
                notifier,
                1024,
            );
            (service, rx)
        }
    }

    fn student() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "student@example.com".to_string(),
            full_name: None,
            role: UserRole::Student,
        }
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            role: UserRole::Admin,
            ..student()
        }
    }

    fn course(price: f64) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Amharic 101".to_string(),
            description: None,
            price,
            currency: "ETB".to_string(),
            instructor_id: Uuid::new_v4(),
            is_published: true,
            status: CourseStatus::Published,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(course_id: Uuid, amount: f64) -> ManualPaymentSubmission {
        ManualPaymentSubmission {
            course_id,
            amount,
            currency: "etb".to_string(),
            payment_method: ManualPaymentMethod::Telebirr,
            payer_account: Some(" 0911000000 ".to_string()),
            transaction_id: " TXN-001 ".to_string(),
            proof: ProofUpload {
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            },
        }
    }

    fn payment_from(p: &NewPayment) -> Payment {
        Payment {
            id: p.id,
            user_id: p.user_id,
            course_id: p.course_id,
            amount: p.amount,
            currency: p.currency.clone(),
            payment_method: p.payment_method,
            payer_account: p.payer_account.clone(),
            transaction_id: p.transaction_id.clone(),
            proof_path: p.proof_path.clone(),
            proof_content_type: p.proof_content_type.clone(),
            status: PaymentStatus::PendingVerification,
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    fn pending_payment() -> Payment {
        payment_from(&NewPayment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            amount: 1500.0,
            currency: "ETB".to_string(),
            payment_method: ManualPaymentMethod::Cbe,
            payer_account: None,
            transaction_id: "FT123".to_string(),
            proof_path: "payment-proofs/x/y/z.png".to_string(),
            proof_content_type: "image/png".to_string(),
        })
    }

    #[test]
    fn test_proof_extension() {
        assert_eq!(proof_extension("image/jpeg"), Some("jpg"));
        assert_eq!(proof_extension("IMAGE/PNG"), Some("png"));
        assert_eq!(proof_extension("application/pdf; charset=binary"), Some("pdf"));
        assert_eq!(proof_extension("image/gif"), None);
        assert_eq!(proof_extension(""), None);
    }

    #[tokio::test]
    async fn test_submit_stores_proof_then_record() {
        let c = course(1500.0);
        let course_id = c.id;
        let user = student();
        let user_id = user.id;

        let mut m = Mocks::new().with_course(c).not_enrolled();
        m.payments
            .expect_transaction_exists()
            .withf(|txn, method| txn == "TXN-001" && *method == ManualPaymentMethod::Telebirr)
            .returning(|_, _| Ok(false));
        m.storage
            .expect_put()
            .withf(move |key, bytes| {
                key.starts_with(&format!("payment-proofs/{user_id}/{course_id}/"))
                    && key.ends_with(".png")
                    && bytes == &vec![1, 2, 3]
            })
            .times(1)
            .returning(|_, _| Ok(()));
        m.storage.expect_remove().times(0);
        m.payments
            .expect_create()
            .withf(|p| {
                p.currency == "ETB"
                    && p.transaction_id == "TXN-001"
                    && p.payer_account.as_deref() == Some("0911000000")
            })
            .times(1)
            .returning(|p| Ok(payment_from(&p)));
        let (service, _rx) = m.build();

        let payment = service
            .submit(&user, submission(course_id, 1500.0))
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::PendingVerification);
        assert_eq!(payment.user_id, user_id);
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_proof_before_lookup() {
        let mut m = Mocks::new();
        m.courses.expect_find_by_id().times(0);
        m.storage.expect_put().times(0);
        let (service, _rx) = m.build();
        let user = student();

        let mut too_big = submission(Uuid::new_v4(), 10.0);
        too_big.proof.bytes = vec![0; 1025];
        let mut wrong_type = submission(Uuid::new_v4(), 10.0);
        wrong_type.proof.content_type = "text/html".to_string();
        let mut empty = submission(Uuid::new_v4(), 10.0);
        empty.proof.bytes.clear();
        let mut no_txn = submission(Uuid::new_v4(), 10.0);
        no_txn.transaction_id = "   ".to_string();

        for s in [too_big, wrong_type, empty, no_txn] {
            assert!(matches!(
                service.submit(&user, s).await.unwrap_err(),
                AppError::Validation { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_submit_amount_mismatch() {
        let c = course(1500.0);
        let id = c.id;
        let mut m = Mocks::new().with_course(c).not_enrolled();
        m.payments.expect_transaction_exists().times(0);
        let (service, _rx) = m.build();

        let err = service
            .submit(&student(), submission(id, 1400.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_submit_currency_mismatch() {
        let c = course(49.99);
        let id = c.id;
        let mut m = Mocks::new().with_course(c).not_enrolled();
        m.payments.expect_transaction_exists().times(0);
        m.storage.expect_put().times(0);
        let (service, _rx) = m.build();

        let mut usd = submission(id, 49.99);
        usd.currency = "USD".to_string();
        match service.submit(&student(), usd).await.unwrap_err() {
            AppError::Validation { details, .. } => {
                assert_eq!(details["expected_currency"], "ETB");
                assert_eq!(details["received_currency"], "USD");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_duplicate_transaction_writes_nothing() {
        let c = course(1500.0);
        let id = c.id;
        let mut m = Mocks::new().with_course(c).not_enrolled();
        m.payments
            .expect_transaction_exists()
            .returning(|_, _| Ok(true));
        m.payments.expect_create().times(0);
        m.storage.expect_put().times(0);
        let (service, _rx) = m.build();

        let err = service
            .submit(&student(), submission(id, 1500.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_staged_proof() {
        let c = course(1500.0);
        let id = c.id;
        let mut m = Mocks::new().with_course(c).not_enrolled();
        m.payments
            .expect_transaction_exists()
            .returning(|_, _| Ok(false));
        m.storage.expect_put().times(1).returning(|_, _| Ok(()));
        m.storage.expect_remove().times(1).returning(|_| Ok(()));
        m.payments.expect_create().returning(|_| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": TRANSACTION_CONSTRAINT }),
            ))
        });
        let (service, _rx) = m.build();

        let err = service
            .submit(&student(), submission(id, 1500.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let c = course(1500.0);
        let id = c.id;
        let mut m = Mocks::new().with_course(c).not_enrolled();
        m.payments
            .expect_transaction_exists()
            .returning(|_, _| Ok(false));
        m.storage.expect_put().returning(|_, _| {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        });
        m.payments.expect_create().times(0);
        let (service, _rx) = m.build();

        let err = service
            .submit(&student(), submission(id, 1500.0))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_free_course_needs_no_payment() {
        let c = course(0.0);
        let id = c.id;
        let (service, _rx) = Mocks::new().with_course(c).not_enrolled().build();

        assert!(matches!(
            service
                .submit(&student(), submission(id, 1.0))
                .await
                .unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn test_verify_enrolls_and_notifies() {
        let payment = pending_payment();
        let id = payment.id;
        let found = payment.clone();
        let mut verified = payment.clone();
        verified.status = PaymentStatus::Verified;

        let mut m = Mocks::new().with_course(course(1500.0));
        m.payments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        m.payments.expect_mark_reviewed().times(0);
        m.payments
            .expect_verify_and_enroll()
            .withf(move |payment_id, _| *payment_id == id)
            .times(1)
            .returning(move |_, _| {
                let enrollment = Enrollment {
                    id: Uuid::new_v4(),
                    user_id: verified.user_id,
                    course_id: verified.course_id,
                    enrolled_at: Utc::now(),
                    payment_provider: Some(PaymentProvider::Manual),
                    payment_reference: Some(verified.transaction_id.clone()),
                    amount_paid: Some(verified.amount),
                    currency: Some(verified.currency.clone()),
                };
                Ok(Some((verified.clone(), Some(enrollment))))
            });
        m.enrollments.expect_create_if_absent().times(0);
        m.users.expect_find_by_id().returning(|_| Ok(None));
        let (service, mut rx) = m.build();

        let (payment, enrollment) = service.verify(&admin(), id).await.unwrap();

        assert_eq!(payment.status, PaymentStatus::Verified);
        assert_eq!(
            enrollment.unwrap().payment_reference.as_deref(),
            Some("FT123")
        );
        let event = rx.try_recv().unwrap();
        assert_eq!(event.source, EnrollmentSource::Manual);
        assert_eq!(event.course_title, "Amharic 101");
    }

    #[tokio::test]
    async fn test_failed_verification_stays_pending_and_can_retry() {
        let payment = pending_payment();
        let id = payment.id;
        let found = payment.clone();
        let mut verified = payment.clone();
        verified.status = PaymentStatus::Verified;

        let mut m = Mocks::new().with_course(course(1500.0));
        m.payments
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(Some(found.clone())));
        let mut attempts = 0;
        m.payments
            .expect_verify_and_enroll()
            .times(2)
            .returning(move |_, _| {
                attempts += 1;
                if attempts == 1 {
                    Err(AppError::internal("Database error", json!({})))
                } else {
                    Ok(Some((verified.clone(), None)))
                }
            });
        let (service, mut rx) = m.build();

        let err = service.verify(&admin(), id).await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
        assert!(rx.try_recv().is_err());

        let (payment, enrollment) = service.verify(&admin(), id).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Verified);
        assert!(enrollment.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_verify_reviewed_payment_is_conflict() {
        let mut payment = pending_payment();
        payment.status = PaymentStatus::Rejected;
        let id = payment.id;

        let mut m = Mocks::new();
        m.payments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(payment.clone())));
        m.payments.expect_verify_and_enroll().times(0);
        let (service, _rx) = m.build();

        assert!(matches!(
            service.verify(&admin(), id).await.unwrap_err(),
            AppError::Conflict { .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_payment_is_not_found() {
        let mut m = Mocks::new();
        m.payments.expect_find_by_id().returning(|_| Ok(None));
        let (service, _rx) = m.build();

        assert!(matches!(
            service
                .reject(&admin(), Uuid::new_v4(), "blurry".to_string())
                .await
                .unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_reject_records_reason() {
        let payment = pending_payment();
        let id = payment.id;
        let found = payment.clone();
        let mut rejected = payment.clone();
        rejected.status = PaymentStatus::Rejected;
        rejected.rejection_reason = Some("Receipt unreadable".to_string());

        let mut m = Mocks::new();
        m.payments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        m.payments
            .expect_mark_reviewed()
            .withf(|_, status, _, reason| {
                *status == PaymentStatus::Rejected
                    && reason.as_deref() == Some("Receipt unreadable")
            })
            .times(1)
            .returning(move |_, _, _, _| Ok(Some(rejected.clone())));
        m.enrollments.expect_create_if_absent().times(0);
        let (service, mut rx) = m.build();

        let payment = service
            .reject(&admin(), id, " Receipt unreadable ".to_string())
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Rejected);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_proof_reads_stored_file() {
        let payment = pending_payment();
        let id = payment.id;
        let path = payment.proof_path.clone();

        let mut m = Mocks::new();
        m.payments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(payment.clone())));
        m.storage
            .expect_get()
            .withf(move |key| key == path)
            .returning(|_| Ok(vec![7, 7]));
        let (service, _rx) = m.build();

        let (payment, bytes) = service.load_proof(id).await.unwrap();
        assert_eq!(payment.id, id);
        assert_eq!(bytes, vec![7, 7]);
    }

    #[tokio::test]
    async fn test_load_proof_missing_file_is_not_found() {
        let payment = pending_payment();
        let id = payment.id;

        let mut m = Mocks::new();
        m.payments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(payment.clone())));
        m.storage
            .expect_get()
            .returning(|key| Err(StorageError::NotFound(key.to_string())));
        let (service, _rx) = m.build();

        assert!(matches!(
            service.load_proof(id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}

//! Stripe webhook reconciliation.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::enrollment_event::{EnrollmentEvent, EnrollmentNotifier, EnrollmentSource};
use crate::domain::entities::{NewEnrollment, PaymentProvider};
use crate::domain::repositories::{EnrollmentRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::payments::{
    CHECKOUT_SESSION_COMPLETED, CompletedCheckoutSession, StripeEvent, WebhookVerifier,
};
use crate::utils::money::from_minor_units;
use serde_json::json;
use uuid::Uuid;

/// What happened to a delivered event. Every variant is acknowledged with 200.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// A new enrollment was written.
    Enrolled { enrollment_id: Uuid },
    /// The enrollment already existed (redelivery or concurrent delivery).
    AlreadyEnrolled,
    /// Event type or payment status this service does not act on.
    Ignored,
}

/// Metadata attached to checkout sessions at creation.
struct CheckoutMetadata {
    course_id: Uuid,
    user_id: Uuid,
    course_title: String,
}

impl CheckoutMetadata {
    fn from_session(session: &CompletedCheckoutSession) -> Result<Self, AppError> {
        let get = |key: &str| {
            session
                .metadata
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let (Some(course_id), Some(user_id), Some(course_title)) =
            (get("course_id"), get("user_id"), get("course_title"))
        else {
            let missing: Vec<&str> = ["course_id", "user_id", "course_title"]
                .into_iter()
                .filter(|&k| get(k).is_none())
                .collect();
            return Err(AppError::bad_request(
                "Missing checkout session metadata",
                json!({ "session_id": session.id, "missing": missing }),
            ));
        };

        let parse = |field: &str, value: &str| {
            Uuid::parse_str(value).map_err(|_| {
                AppError::bad_request(
                    "Invalid checkout session metadata",
                    json!({ "session_id": session.id, "field": field }),
                )
            })
        };

        Ok(Self {
            course_id: parse("course_id", course_id)?,
            user_id: parse("user_id", user_id)?,
            course_title: course_title.to_string(),
        })
    }
}

/// Turns completed Stripe checkouts into enrollments, exactly once per
/// (user, course) regardless of how often Stripe delivers the event.
pub struct WebhookService<E: EnrollmentRepository, U: UserRepository> {
    enrollment_repository: Arc<E>,
    user_repository: Arc<U>,
    verifier: Option<WebhookVerifier>,
    notifier: EnrollmentNotifier,
}

impl<E: EnrollmentRepository, U: UserRepository> WebhookService<E, U> {
    /// `verifier` is `None` when no webhook secret is configured; every
    /// delivery then fails with a server error.
    pub fn new(
        enrollment_repository: Arc<E>,
        user_repository: Arc<U>,
        verifier: Option<WebhookVerifier>,
        notifier: EnrollmentNotifier,
    ) -> Self {
        Self {
            enrollment_repository,
            user_repository,
            verifier,
            notifier,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.verifier.is_some()
    }

    /// Verifies and processes one webhook delivery.
    ///
    /// The signature is checked against the raw body before anything is
    /// parsed or written.
    ///
    /// # Errors
    ///
    /// - [`AppError::Internal`] if no webhook secret is configured, or on database errors
    /// - [`AppError::Validation`] for a missing/invalid signature, an unparseable
    ///   payload, or a paid session without usable metadata
    pub async fn handle_stripe_event(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, AppError> {
        let verifier = self.verifier.as_ref().ok_or_else(|| {
            tracing::error!("Stripe webhook received but STRIPE_WEBHOOK_SECRET is not set");
            AppError::internal("Webhook secret not configured", json!({}))
        })?;

        let signature = signature.ok_or_else(|| {
            AppError::bad_request("Missing Stripe-Signature header", json!({}))
        })?;

        verifier
            .verify(payload, signature, Utc::now().timestamp())
            .map_err(|e| {
                AppError::bad_request("Invalid webhook signature", json!({ "reason": e.to_string() }))
            })?;

        let event: StripeEvent = serde_json::from_slice(payload).map_err(|e| {
            AppError::bad_request("Invalid webhook payload", json!({ "reason": e.to_string() }))
        })?;

        if event.event_type != CHECKOUT_SESSION_COMPLETED {
            tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored);
        }

        let session: CompletedCheckoutSession = serde_json::from_value(event.data.object)
            .map_err(|e| {
                AppError::bad_request(
                    "Invalid checkout session payload",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        if !session.is_paid() {
            tracing::info!(
                event_id = %event.id,
                session_id = %session.id,
                payment_status = ?session.payment_status,
                "Checkout completed without payment, ignoring"
            );
            return Ok(WebhookOutcome::Ignored);
        }

        self.reconcile(&session).await
    }

    async fn reconcile(
        &self,
        session: &CompletedCheckoutSession,
    ) -> Result<WebhookOutcome, AppError> {
        let metadata = CheckoutMetadata::from_session(session)?;

        if self
            .enrollment_repository
            .find(metadata.user_id, metadata.course_id)
            .await?
            .is_some()
        {
            tracing::info!(
                session_id = %session.id,
                user_id = %metadata.user_id,
                course_id = %metadata.course_id,
                "Enrollment already exists, skipping"
            );
            return Ok(WebhookOutcome::AlreadyEnrolled);
        }

        let new_enrollment = NewEnrollment::paid(
            metadata.user_id,
            metadata.course_id,
            PaymentProvider::Stripe,
            session.payment_reference().to_string(),
            session.amount_total.map(from_minor_units),
            session.currency.as_deref().map(str::to_ascii_uppercase),
        );

        let Some(enrollment) = self
            .enrollment_repository
            .create_if_absent(new_enrollment)
            .await?
        else {
            tracing::info!(session_id = %session.id, "Enrollment created by a concurrent delivery");
            return Ok(WebhookOutcome::AlreadyEnrolled);
        };

        tracing::info!(
            enrollment_id = %enrollment.id,
            session_id = %session.id,
            user_id = %enrollment.user_id,
            course_id = %enrollment.course_id,
            "Enrollment created from Stripe checkout"
        );

        let mut event = EnrollmentEvent::new(
            &enrollment,
            metadata.course_title,
            EnrollmentSource::Stripe,
        );
        match self.user_repository.find_by_id(metadata.user_id).await {
            Ok(Some(user)) => event = event.with_recipient(user.email, user.full_name),
            Ok(None) => tracing::warn!(user_id = %metadata.user_id, "Enrolled user not found, skipping email"),
            Err(e) => tracing::warn!(user_id = %metadata.user_id, error = %e, "User lookup failed, skipping email"),
        }
        self.notifier.notify(event);

        Ok(WebhookOutcome::Enrolled {
            enrollment_id: enrollment.id,
        })
    }
}

//! Enrollment initiation for free and paid courses.

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::enrollment_event::{EnrollmentEvent, EnrollmentNotifier, EnrollmentSource};
use crate::domain::entities::{Course, CurrentUser, Enrollment, NewEnrollment};
use crate::domain::repositories::{CourseRepository, EnrollmentRepository};
use crate::error::AppError;
use crate::infrastructure::payments::{CheckoutRequest, PaymentGateway, PaymentGatewayError};
use crate::utils::money::{amounts_match, currencies_match, to_minor_units};
use serde_json::json;
use uuid::Uuid;

const DEFAULT_PRODUCT_DESCRIPTION: &str = "Course enrollment";

/// Where checkout redirects go and how long a session stays open.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub app_url: String,
    pub expiry_minutes: i64,
}

/// Result of an enrollment request.
#[derive(Debug, Clone)]
pub enum EnrollOutcome {
    /// Free course: the enrollment exists now.
    Enrolled {
        enrollment: Enrollment,
        redirect_url: String,
    },
    /// Paid course: the student must complete the hosted checkout.
    Checkout {
        payment_url: String,
        session_id: String,
    },
}

pub struct EnrollmentService<C: CourseRepository, E: EnrollmentRepository> {
    course_repository: Arc<C>,
    enrollment_repository: Arc<E>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: EnrollmentNotifier,
    checkout: CheckoutSettings,
}

impl<C: CourseRepository, E: EnrollmentRepository> EnrollmentService<C, E> {
    pub fn new(
        course_repository: Arc<C>,
        enrollment_repository: Arc<E>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: EnrollmentNotifier,
        checkout: CheckoutSettings,
    ) -> Self {
        Self {
            course_repository,
            enrollment_repository,
            gateway,
            notifier,
            checkout,
        }
    }

    /// Starts enrollment of `user` in `course_id`.
    ///
    /// Checks, in order: course is available (404), not already enrolled
    /// (409), not the course's own instructor (400), and for paid courses
    /// that the quoted amount and currency match the price (400).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Payment`] if the checkout session cannot be created.
    pub async fn enroll(
        &self,
        user: &CurrentUser,
        course_id: Uuid,
        amount: Option<f64>,
        currency: Option<String>,
    ) -> Result<EnrollOutcome, AppError> {
        let course = load_available_course(self.course_repository.as_ref(), course_id).await?;
        ensure_can_enroll(self.enrollment_repository.as_ref(), user.id, &course).await?;

        if course.is_free() {
            return self.enroll_free(user, &course).await;
        }

        ensure_amount_matches(&course, amount, currency.as_deref())?;
        self.start_checkout(user, &course).await
    }

    /// Enrollments of `user_id`, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Enrollment>, AppError> {
        self.enrollment_repository.list_for_user(user_id).await
    }

    async fn enroll_free(
        &self,
        user: &CurrentUser,
        course: &Course,
    ) -> Result<EnrollOutcome, AppError> {
        let enrollment = self
            .enrollment_repository
            .create_if_absent(NewEnrollment::free(user.id, course.id))
            .await?
            .ok_or_else(|| already_enrolled(course.id))?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            user_id = %user.id,
            course_id = %course.id,
            "Free enrollment created"
        );

        self.notifier.notify(
            EnrollmentEvent::new(&enrollment, course.title.clone(), EnrollmentSource::Free)
                .with_recipient(user.email.clone(), user.full_name.clone()),
        );

        Ok(EnrollOutcome::Enrolled {
            enrollment,
            redirect_url: format!("/courses/{}", course.id),
        })
    }

    async fn start_checkout(
        &self,
        user: &CurrentUser,
        course: &Course,
    ) -> Result<EnrollOutcome, AppError> {
        let app_url = self.checkout.app_url.trim_end_matches('/');
        let course_url = format!("{app_url}/courses/{}", course.id);

        let request = CheckoutRequest {
            course_id: course.id,
            course_title: course.title.clone(),
            course_description: course
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRODUCT_DESCRIPTION.to_string()),
            user_id: user.id,
            customer_email: user.email.clone(),
            unit_amount: to_minor_units(course.price),
            currency: course.currency.to_ascii_lowercase(),
            success_url: format!(
                "{course_url}?payment=success&session_id={{CHECKOUT_SESSION_ID}}"
            ),
            cancel_url: format!("{course_url}?payment=cancelled"),
            expires_at: Utc::now() + Duration::minutes(self.checkout.expiry_minutes),
        };

        let session = self
            .gateway
            .create_checkout_session(request)
            .await
            .map_err(|e| checkout_failed(course.id, e))?;

        let payment_url = session
            .url
            .ok_or_else(|| checkout_failed(course.id, PaymentGatewayError::MissingUrl))?;

        tracing::info!(
            user_id = %user.id,
            course_id = %course.id,
            session_id = %session.id,
            "Checkout session created"
        );

        Ok(EnrollOutcome::Checkout {
            payment_url,
            session_id: session.id,
        })
    }
}

/// Loads a course students can enroll in, or fails with 404.
pub(crate) async fn load_available_course<C>(
    repository: &C,
    course_id: Uuid,
) -> Result<Course, AppError>
where
    C: CourseRepository + ?Sized,
{
    repository
        .find_by_id(course_id)
        .await?
        .filter(Course::is_available)
        .ok_or_else(|| AppError::not_found("Course not found", json!({ "course_id": course_id })))
}

/// Rejects users who are already enrolled (409) or teach the course (400).
pub(crate) async fn ensure_can_enroll<E>(
    repository: &E,
    user_id: Uuid,
    course: &Course,
) -> Result<(), AppError>
where
    E: EnrollmentRepository + ?Sized,
{
    if repository.find(user_id, course.id).await?.is_some() {
        return Err(already_enrolled(course.id));
    }

    if course.is_owned_by(user_id) {
        return Err(AppError::bad_request(
            "Instructors cannot enroll in their own course",
            json!({ "course_id": course.id }),
        ));
    }

    Ok(())
}

/// Checks a quoted price against the course price.
pub(crate) fn ensure_amount_matches(
    course: &Course,
    amount: Option<f64>,
    currency: Option<&str>,
) -> Result<(), AppError> {
    let Some(amount) = amount else {
        return Err(AppError::bad_request(
            "Amount is required for paid courses",
            json!({ "expected_amount": course.price, "currency": course.currency }),
        ));
    };

    if !amount.is_finite() || !amounts_match(amount, course.price) {
        return Err(AppError::bad_request(
            "Amount does not match course price",
            json!({ "expected_amount": course.price, "received_amount": amount }),
        ));
    }

    if let Some(currency) = currency
        && !currencies_match(currency, &course.currency)
    {
        return Err(AppError::bad_request(
            "Currency does not match course currency",
            json!({ "expected_currency": course.currency, "received_currency": currency }),
        ));
    }

    Ok(())
}

pub(crate) fn already_enrolled(course_id: Uuid) -> AppError {
    AppError::conflict(
        "Already enrolled in this course",
        json!({ "course_id": course_id }),
    )
}

fn checkout_failed(course_id: Uuid, e: PaymentGatewayError) -> AppError {
    tracing::error!(course_id = %course_id, error = %e, "Checkout session creation failed");

    let message = match e {
        PaymentGatewayError::NotConfigured => "Card payments are not available",
        _ => "Failed to create checkout session",
    };
    AppError::payment(message, json!({ "course_id": course_id }))
}

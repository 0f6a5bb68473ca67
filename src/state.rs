//! Shared application state passed to every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, CheckoutSettings, CourseService, EnrollmentService, ManualPaymentService,
    WebhookService,
};
use crate::domain::enrollment_event::EnrollmentNotifier;
use crate::infrastructure::email::Mailer;
use crate::infrastructure::payments::{PaymentGateway, WebhookVerifier};
use crate::infrastructure::persistence::{
    PgCourseRepository, PgEnrollmentRepository, PgPaymentRepository, PgSessionRepository,
    PgUserRepository,
};
use crate::infrastructure::storage::ProofStorage;

pub type PgAuthService = AuthService<PgSessionRepository>;
pub type PgCourseService = CourseService<PgCourseRepository>;
pub type PgEnrollmentService = EnrollmentService<PgCourseRepository, PgEnrollmentRepository>;
pub type PgWebhookService = WebhookService<PgEnrollmentRepository, PgUserRepository>;
pub type PgManualPaymentService = ManualPaymentService<
    PgCourseRepository,
    PgEnrollmentRepository,
    PgPaymentRepository,
    PgUserRepository,
>;

/// Outbound integrations, chosen at startup from configuration.
pub struct Integrations {
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn ProofStorage>,
    pub webhook_verifier: Option<WebhookVerifier>,
}

/// Service tuning taken from configuration.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub session_signing_secret: String,
    pub checkout: CheckoutSettings,
    pub max_proof_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub auth_service: Arc<PgAuthService>,
    pub course_service: Arc<PgCourseService>,
    pub enrollment_service: Arc<PgEnrollmentService>,
    pub webhook_service: Arc<PgWebhookService>,
    pub manual_payment_service: Arc<PgManualPaymentService>,
    pub notifier: EnrollmentNotifier,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn ProofStorage>,
    pub max_proof_bytes: usize,
    /// Marks dashboard cookies `Secure`; set when the app is served over HTTPS.
    pub secure_cookies: bool,
}

impl AppState {
    /// Wires the PostgreSQL repositories into every service.
    pub fn new(
        pool: Arc<PgPool>,
        notifier: EnrollmentNotifier,
        integrations: Integrations,
        settings: ServiceSettings,
    ) -> Self {
        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let sessions = Arc::new(PgSessionRepository::new(pool.clone()));
        let courses = Arc::new(PgCourseRepository::new(pool.clone()));
        let enrollments = Arc::new(PgEnrollmentRepository::new(pool.clone()));
        let payments = Arc::new(PgPaymentRepository::new(pool.clone()));

        let Integrations {
            gateway,
            mailer,
            storage,
            webhook_verifier,
        } = integrations;

        let secure_cookies = settings.checkout.app_url.starts_with("https://");

        let auth_service = Arc::new(AuthService::new(
            sessions,
            settings.session_signing_secret,
        ));
        let course_service = Arc::new(CourseService::new(courses.clone()));
        let enrollment_service = Arc::new(EnrollmentService::new(
            courses.clone(),
            enrollments.clone(),
            gateway.clone(),
            notifier.clone(),
            settings.checkout,
        ));
        let webhook_service = Arc::new(WebhookService::new(
            enrollments.clone(),
            users.clone(),
            webhook_verifier,
            notifier.clone(),
        ));
        let manual_payment_service = Arc::new(ManualPaymentService::new(
            courses,
            enrollments,
            payments,
            users,
            storage.clone(),
            notifier.clone(),
            settings.max_proof_bytes,
        ));

        Self {
            db: pool,
            auth_service,
            course_service,
            enrollment_service,
            webhook_service,
            manual_payment_service,
            notifier,
            gateway,
            mailer,
            storage,
            max_proof_bytes: settings.max_proof_bytes,
            secure_cookies,
        }
    }
}

//! Application layer services implementing business logic.
//!
//! Services consume repository traits and infrastructure interfaces and
//! provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Session token authentication and issuing
//! - [`services::course_service::CourseService`] - Catalog, drafts and review transitions
//! - [`services::enrollment_service::EnrollmentService`] - Free enrollment and checkout
//! - [`services::webhook_service::WebhookService`] - Stripe webhook reconciliation
//! - [`services::manual_payment_service::ManualPaymentService`] - Offline payments and review

pub mod services;

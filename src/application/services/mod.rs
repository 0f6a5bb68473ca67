//! Business logic services for the application layer.

pub mod auth_service;
pub mod course_service;
pub mod enrollment_service;
pub mod manual_payment_service;
pub mod webhook_service;

pub use auth_service::AuthService;
pub use course_service::CourseService;
pub use enrollment_service::{CheckoutSettings, EnrollOutcome, EnrollmentService};
pub use manual_payment_service::{ManualPaymentService, ManualPaymentSubmission, ProofUpload};
pub use webhook_service::{WebhookOutcome, WebhookService};

//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod courses;
pub mod enroll;
pub mod health;
pub mod manual_payment;
pub mod webhook;

pub use admin::{
    approve_course_handler, list_payments_handler, reject_course_handler,
    reject_payment_handler, verify_payment_handler,
};
pub use courses::{
    create_course_handler, get_course_handler, list_courses_handler, submit_course_handler,
};
pub use enroll::{enroll_handler, list_enrollments_handler};
pub use health::health_handler;
pub use manual_payment::submit_manual_payment_handler;
pub use webhook::stripe_webhook_handler;

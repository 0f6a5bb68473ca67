//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts
//! - [`PgSessionRepository`] - Session token storage and lookup
//! - [`PgCourseRepository`] - Courses and review status changes
//! - [`PgEnrollmentRepository`] - Idempotent enrollment creation
//! - [`PgPaymentRepository`] - Manual payment records and review
//! - [`PgAnalyticsRepository`] - Analytics event log

pub mod pg_analytics_repository;
pub mod pg_course_repository;
pub mod pg_enrollment_repository;
pub mod pg_payment_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;
mod rows;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_course_repository::PgCourseRepository;
pub use pg_enrollment_repository::PgEnrollmentRepository;
pub use pg_payment_repository::PgPaymentRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;

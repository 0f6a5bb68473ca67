//! Repository trait definitions for the domain layer.
//!
//! Traits define the data access contract; PostgreSQL implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated with
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts
//! - [`SessionRepository`] - Bearer session tokens
//! - [`CourseRepository`] - Courses and their review status
//! - [`EnrollmentRepository`] - Enrollments (unique per user and course)
//! - [`PaymentRepository`] - Manual payment records
//! - [`AnalyticsRepository`] - Product analytics events
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod analytics_repository;
pub mod course_repository;
pub mod enrollment_repository;
pub mod payment_repository;
pub mod session_repository;
pub mod user_repository;

pub use analytics_repository::{AnalyticsRepository, NewAnalyticsEvent};
pub use course_repository::CourseRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use payment_repository::PaymentRepository;
pub use session_repository::{Session, SessionRepository};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures with small helpers for status checks.
//!
//! # Entity Types
//!
//! - [`User`] - An authenticated account with a role
//! - [`Course`] - A course authored by an instructor and reviewed by admins
//! - [`Enrollment`] - The record granting a user access to a course
//! - [`Payment`] - A manual (offline) payment awaiting admin review
//!
//! Separate `New*` structs carry the fields needed to create a record.

pub mod course;
pub mod enrollment;
pub mod payment;
pub mod user;

pub use course::{Course, CourseStatus, NewCourse};
pub use enrollment::{Enrollment, NewEnrollment, PaymentProvider};
pub use payment::{ManualPaymentMethod, NewPayment, Payment, PaymentStatus};
pub use user::{CurrentUser, User, UserRole};

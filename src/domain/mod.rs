//! Domain layer containing business entities and logic.
//!
//! Entities, repository interfaces and the enrollment side-effect pipeline,
//! independent of HTTP and SQL concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`enrollment_event`] - Enrollment side-effect event and its queue handle
//! - [`enrollment_worker`] - Background processing with retry and backoff
//!
//! # Enrollment Side Effects
//!
//! 1. A service creates an enrollment
//! 2. [`enrollment_event::EnrollmentEvent`] is pushed to a bounded channel (non-blocking)
//! 3. [`enrollment_worker::run_enrollment_worker`] records analytics and sends the email
//! 4. Final failures are logged and dropped

pub mod enrollment_event;
pub mod enrollment_worker;
pub mod entities;
pub mod repositories;

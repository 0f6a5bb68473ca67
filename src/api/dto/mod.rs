//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod course;
pub mod enroll;
pub mod health;
pub mod pagination;
pub mod payment;

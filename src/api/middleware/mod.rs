//! HTTP middleware for request processing and protection.
//!
//! Provides session authentication, the admin guard, rate limiting, and
//! request tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;

//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the interfaces the domain and application
//! layers depend on.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`payments`] - Stripe Checkout client and webhook verification
//! - [`email`] - Transactional email (HTTP API and no-op implementations)
//! - [`storage`] - Payment proof file storage

pub mod email;
pub mod payments;
pub mod persistence;
pub mod storage;

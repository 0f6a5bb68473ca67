//! Small helpers shared across layers.
//!
//! - [`session_token`] - Session token generation and HMAC hashing
//! - [`money`] - Minor-unit conversion and amount comparison
//! - [`db_error`] - Constraint-specific error checks

pub mod db_error;
pub mod money;
pub mod session_token;

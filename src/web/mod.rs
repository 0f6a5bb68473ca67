//! Admin dashboard for browser-based review.
//!
//! Server-rendered pages (Askama templates) for the manual payment queue:
//! viewing proofs and verifying or rejecting payments.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering and form handlers
//! - [`middleware`] - Cookie session authentication (admins only)
//! - [`routes`] - Dashboard route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;

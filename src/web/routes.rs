//! Web dashboard route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    dashboard_handler, login_page_handler, login_submit_handler, logout_handler, proof_handler,
    reject_form_handler, verify_form_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Dashboard routes requiring an admin session cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /`                       - Pending manual payments
/// - `GET  /payments/{id}/proof`    - Uploaded proof file
/// - `POST /payments/{id}/verify`   - Verify and enroll
/// - `POST /payments/{id}/reject`   - Reject with a reason
/// - `POST /logout`                 - Clear the session cookie
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/payments/{id}/proof", get(proof_handler))
        .route("/payments/{id}/verify", post(verify_form_handler))
        .route("/payments/{id}/reject", post(reject_form_handler))
        .route("/logout", post(logout_handler))
}

/// Public dashboard routes without authentication.
///
/// # Endpoints
///
/// - `GET  /login` - Login form
/// - `POST /login` - Exchange a session token for the dashboard cookie
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", get(login_page_handler).post(login_submit_handler))
}

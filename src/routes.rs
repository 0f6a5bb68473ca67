//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /health`              - Health check (public)
//! - `/api/courses` (GET)        - Catalog (bearer token optional)
//! - `/api/*`                    - REST API (bearer session required)
//! - `/api/admin/*`              - Review API (admin session required)
//! - `/api/webhooks/stripe`      - Stripe events (signature verified, not rate-limited)
//! - `/dashboard/*`              - Admin web UI (cookie session required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Body limit** - Proof size plus multipart overhead
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Bearer session (API) or cookie session (web)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Room for the text fields and multipart framing around the proof file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Constructs the application router with all routes and middleware.
///
/// The server must provide `ConnectInfo<SocketAddr>` for the per-IP rate
/// limiters.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let body_limit = state.max_proof_bytes + MULTIPART_OVERHEAD_BYTES;

    let public_api = api::routes::public_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_layer,
        ))
        .layer(rate_limit::layer());

    let protected_api = api::routes::protected_routes(body_limit)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let admin_api = api::routes::admin_routes()
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let api_router = Router::new()
        .merge(public_api)
        .merge(protected_api)
        .merge(admin_api)
        .merge(api::routes::webhook_routes());

    let web_protected = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        ))
        .layer(rate_limit::secure_layer());

    let web_public = web::routes::public_routes().layer(rate_limit::layer());

    let web_router = Router::new().merge(web_protected).merge(web_public);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest("/dashboard", web_router)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

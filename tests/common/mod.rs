#![allow(dead_code)]

use axum::{Router, middleware};
use sqlx::PgPool;
use std::sync::Arc;
use tabor_academy::api;
use tabor_academy::api::middleware::auth;
use tabor_academy::application::services::CheckoutSettings;
use tabor_academy::domain::enrollment_event::{EnrollmentEvent, EnrollmentNotifier};
use tabor_academy::infrastructure::email::NullMailer;
use tabor_academy::infrastructure::payments::{StripeClient, WebhookVerifier, compute_signature};
use tabor_academy::infrastructure::storage::LocalProofStorage;
use tabor_academy::state::{AppState, Integrations, ServiceSettings};
use tabor_academy::utils::session_token::hash_session_token;
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const APP_URL: &str = "http://localhost:3000";
pub const MAX_PROOF_BYTES: usize = 64 * 1024;

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (id, email, full_name, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(Some("Test User"))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts a course in `status`; `published` also sets `is_published`.
pub async fn create_course(
    pool: &PgPool,
    instructor_id: Uuid,
    title: &str,
    price: f64,
    currency: &str,
    status: &str,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO courses (id, title, description, price, currency, instructor_id, is_published, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(Some("A test course"))
    .bind(price)
    .bind(currency)
    .bind(instructor_id)
    .bind(status == "published")
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_published_course(pool: &PgPool, price: f64, currency: &str) -> Uuid {
    let instructor = create_user(
        pool,
        &format!("instructor-{}@example.com", Uuid::new_v4()),
        "instructor",
    )
    .await;
    create_course(pool, instructor, "Intro to Amharic", price, currency, "published").await
}

/// Stores a session for `user_id` and returns the raw bearer token.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> String {
    let token = format!("test-token-{}", Uuid::new_v4());
    sqlx::query("INSERT INTO sessions (user_id, token_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(hash_session_token(TEST_SECRET, &token))
        .execute(pool)
        .await
        .unwrap();
    token
}

/// Creates a user with a live session; returns (user id, bearer token).
pub async fn create_authenticated_user(pool: &PgPool, role: &str) -> (Uuid, String) {
    let id = create_user(pool, &format!("{role}-{}@example.com", Uuid::new_v4()), role).await;
    let token = create_session(pool, id).await;
    (id, token)
}

pub async fn count_enrollments(pool: &PgPool, user_id: Uuid, course_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND course_id = $2")
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Makes every enrollment insert fail until [`allow_enrollment_inserts`].
pub async fn block_enrollment_inserts(pool: &PgPool) {
    sqlx::query(
        "CREATE FUNCTION reject_enrollment() RETURNS trigger AS $$
         BEGIN
             RAISE EXCEPTION 'enrollments are read-only';
         END;
         $$ LANGUAGE plpgsql",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "CREATE TRIGGER enrollments_read_only BEFORE INSERT ON enrollments
         FOR EACH ROW EXECUTE FUNCTION reject_enrollment()",
    )
    .execute(pool)
    .await
    .unwrap();
}

pub async fn allow_enrollment_inserts(pool: &PgPool) {
    sqlx::query("DROP TRIGGER enrollments_read_only ON enrollments")
        .execute(pool)
        .await
        .unwrap();
}

/// Stripe-Signature header value for `payload` signed now.
pub fn stripe_signature(payload: &[u8]) -> String {
    let ts = chrono::Utc::now().timestamp();
    format!("t={ts},v1={}", compute_signature(WEBHOOK_SECRET, ts, payload))
}

/// Outbound integration settings for a test state.
#[derive(Default)]
pub struct TestOptions {
    /// Stripe secret key; checkout is disabled without one.
    pub stripe_key: Option<String>,
    /// Base URL of a mock Stripe API.
    pub stripe_base: Option<String>,
    pub webhook_secret: bool,
}

pub struct TestContext {
    pub state: AppState,
    pub events: mpsc::Receiver<EnrollmentEvent>,
    pub proof_dir: TempDir,
}

pub fn create_test_state(pool: PgPool) -> TestContext {
    create_test_state_with(
        pool,
        TestOptions {
            webhook_secret: true,
            ..TestOptions::default()
        },
    )
}

pub fn create_test_state_with(pool: PgPool, options: TestOptions) -> TestContext {
    let proof_dir = tempfile::tempdir().unwrap();
    let (notifier, events) = EnrollmentNotifier::channel(100);

    let gateway = StripeClient::new(
        options.stripe_key,
        options
            .stripe_base
            .unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
    )
    .unwrap();

    let state = AppState::new(
        Arc::new(pool),
        notifier,
        Integrations {
            gateway: Arc::new(gateway),
            mailer: Arc::new(NullMailer::new()),
            storage: Arc::new(LocalProofStorage::new(proof_dir.path())),
            webhook_verifier: options
                .webhook_secret
                .then(|| WebhookVerifier::new(WEBHOOK_SECRET, 300)),
        },
        ServiceSettings {
            session_signing_secret: TEST_SECRET.to_string(),
            checkout: CheckoutSettings {
                app_url: APP_URL.to_string(),
                expiry_minutes: 30,
            },
            max_proof_bytes: MAX_PROOF_BYTES,
        },
    );

    TestContext {
        state,
        events,
        proof_dir,
    }
}

/// The `/api` router with authentication but without rate limiting, which
/// needs the peer address the in-memory transport does not provide.
pub fn api_router(state: AppState) -> Router {
    let public = api::routes::public_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::optional_layer,
    ));

    let protected = api::routes::protected_routes(MAX_PROOF_BYTES + 64 * 1024)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let admin = api::routes::admin_routes()
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api = Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .merge(api::routes::webhook_routes());

    Router::new().nest("/api", api).with_state(state)
}

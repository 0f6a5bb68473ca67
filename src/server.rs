//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, integration setup, worker spawning, and Axum server lifecycle.

use crate::application::services::CheckoutSettings;
use crate::config::Config;
use crate::domain::enrollment_event::EnrollmentNotifier;
use crate::domain::enrollment_worker::{RetryPolicy, run_enrollment_worker};
use crate::infrastructure::email::{HttpMailer, Mailer, NullMailer};
use crate::infrastructure::payments::{StripeClient, WebhookVerifier};
use crate::infrastructure::persistence::PgAnalyticsRepository;
use crate::infrastructure::storage::LocalProofStorage;
use crate::routes::app_router;
use crate::state::{AppState, Integrations, ServiceSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Stripe client, mailer and proof storage
/// - Background enrollment worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - An HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let gateway = Arc::new(
        StripeClient::new(config.stripe_secret_key.clone(), &config.stripe_api_base)
            .context("Failed to build Stripe client")?,
    );
    if config.is_stripe_enabled() {
        tracing::info!("Stripe checkout enabled");
    } else {
        tracing::info!("Stripe checkout disabled (STRIPE_SECRET_KEY not set)");
    }

    let webhook_verifier = config.stripe_webhook_secret.as_ref().map(|secret| {
        WebhookVerifier::new(secret.clone(), config.stripe_webhook_tolerance_secs)
    });

    let mailer: Arc<dyn Mailer> = match &config.email_api_key {
        Some(key) => {
            tracing::info!("Email delivery enabled");
            Arc::new(
                HttpMailer::new(&config.email_api_url, key, &config.email_from)
                    .context("Failed to build mailer")?,
            )
        }
        None => {
            tracing::info!("Email delivery disabled (NullMailer)");
            Arc::new(NullMailer::new())
        }
    };

    let storage = Arc::new(LocalProofStorage::new(&config.proof_storage_dir));

    let pool = Arc::new(pool);

    let (notifier, rx) = EnrollmentNotifier::channel(config.notification_queue_capacity);
    let analytics = Arc::new(PgAnalyticsRepository::new(pool.clone()));
    let policy = RetryPolicy {
        max_retries: config.notification_max_retries,
        ..RetryPolicy::default()
    };
    tokio::spawn(run_enrollment_worker(
        rx,
        analytics,
        mailer.clone(),
        policy,
        config.app_url.clone(),
    ));

    let state = AppState::new(
        pool,
        notifier,
        Integrations {
            gateway,
            mailer,
            storage,
            webhook_verifier,
        },
        ServiceSettings {
            session_signing_secret: config.session_signing_secret.clone(),
            checkout: CheckoutSettings {
                app_url: config.app_url.clone(),
                expiry_minutes: config.checkout_expiry_minutes,
            },
            max_proof_bytes: config.max_proof_bytes,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

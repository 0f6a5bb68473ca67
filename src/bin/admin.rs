//! CLI administration tool for Tabor Academy.
//!
//! Provides commands for managing users and sessions, approving courses,
//! viewing the payment queue and performing database operations without
//! requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin account
//! cargo run --bin admin -- user create --email ops@taboracademy.com --role admin
//!
//! # Issue a bearer session for that account
//! cargo run --bin admin -- session issue ops@taboracademy.com --days 7
//!
//! # Revoke a session
//! cargo run --bin admin -- session revoke 12
//!
//! # Publish a course waiting for review
//! cargo run --bin admin -- course approve 3f6c...
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `SESSION_SIGNING_SECRET` (required for `session issue`): must match the server

use tabor_academy::application::services::{AuthService, CourseService};
use tabor_academy::domain::entities::{PaymentStatus, UserRole};
use tabor_academy::domain::repositories::{PaymentRepository, UserRepository};
use tabor_academy::infrastructure::persistence::{
    PgCourseRepository, PgPaymentRepository, PgSessionRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing Tabor Academy.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage bearer sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Course review
    Course {
        #[command(subcommand)]
        action: CourseAction,
    },

    /// Manual payment queue
    Payment {
        #[command(subcommand)]
        action: PaymentAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user account
    Create {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        /// student, instructor or admin
        #[arg(short, long, default_value = "student")]
        role: UserRole,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Issue a session token for a user
    Issue {
        /// Email of the account
        email: String,

        /// Expire after this many days (never expires if omitted)
        #[arg(short, long)]
        days: Option<i64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Revoke a session by ID
    Revoke { id: i64 },
}

#[derive(Subcommand)]
enum CourseAction {
    /// Publish a course that is pending review
    Approve { id: Uuid },
}

#[derive(Subcommand)]
enum PaymentAction {
    /// List manual payments by status
    List {
        /// pending_verification, verified or rejected
        #[arg(short, long, default_value = "pending_verification")]
        status: PaymentStatus,

        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Session { action } => handle_session_action(action, &pool).await?,
        Commands::Course { action } => handle_course_action(action, &pool).await?,
        Commands::Payment { action } => handle_payment_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { email, name, role } => {
            println!("{}", "👤 Create User".bright_blue().bold());
            println!();

            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };

            let user = repo
                .create(email.trim(), name, role)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!("{}", "✅ User created".green().bold());
            println!("  ID:    {}", user.id.to_string().bright_black());
            println!("  Email: {}", user.email.cyan());
            println!("  Role:  {}", user.role.to_string().bright_white());
            println!();
        }
        UserAction::List => {
            println!("{}", "📋 Users".bright_blue().bold());
            println!();

            let users = repo
                .list()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

            if users.is_empty() {
                println!("{}", "  No users found".yellow());
                return Ok(());
            }

            println!(
                "  {:<36} {:<32} {:<11} {:<16}",
                "ID".bright_white().bold(),
                "Email".bright_white().bold(),
                "Role".bright_white().bold(),
                "Created".bright_white().bold()
            );
            println!("  {}", "─".repeat(98).bright_black());

            for user in &users {
                println!(
                    "  {:<36} {:<32} {:<11} {}",
                    user.id.to_string().bright_black(),
                    user.email.cyan(),
                    user.role.to_string(),
                    user.created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }

            println!();
            println!("  Total: {}", users.len().to_string().bright_white().bold());
            println!();
        }
    }

    Ok(())
}

/// Session commands.
///
/// The raw token is printed once; only its HMAC (keyed by
/// `SESSION_SIGNING_SECRET`) is stored, so it cannot be shown again.
async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let secret = std::env::var("SESSION_SIGNING_SECRET")
        .context("SESSION_SIGNING_SECRET must be set")?;
    let auth = AuthService::new(Arc::new(PgSessionRepository::new(pool.clone())), secret);

    match action {
        SessionAction::Issue { email, days, yes } => {
            println!("{}", "🔑 Issue Session".bright_blue().bold());
            println!();

            let users = PgUserRepository::new(pool);
            let user = users
                .find_by_email(email.trim())
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("User not found")?;

            let expires_at = days.map(|d| Utc::now() + Duration::days(d));

            println!("  User:    {} ({})", user.email.cyan(), user.role);
            println!(
                "  Expires: {}",
                expires_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string())
            );
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Issue this session?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let (token, session) = auth
                .issue_session(user.id, expires_at)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to issue session: {}", e))?;

            println!();
            println!("{}", "✅ Session issued".green().bold());
            println!("  ID:    {}", session.id.to_string().bright_black());
            println!("  Token: {}", token.bright_yellow().bold());
            println!();
            println!(
                "{}",
                "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
                    .red()
                    .bold()
            );
            println!();
            println!(
                "  {}: Bearer {}",
                "Authorization".bright_cyan(),
                token.bright_yellow()
            );
            println!();
        }
        SessionAction::Revoke { id } => {
            let confirmed = Confirm::new()
                .with_prompt(format!("Revoke session {id}?"))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            let revoked = auth
                .revoke_session(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to revoke session: {}", e))?;

            if revoked {
                println!("{}", "✅ Session revoked".green().bold());
            } else {
                println!("{}", "⚠️  Session not found or already revoked".yellow());
            }
        }
    }

    Ok(())
}

async fn handle_course_action(action: CourseAction, pool: &PgPool) -> Result<()> {
    let service = CourseService::new(Arc::new(PgCourseRepository::new(Arc::new(pool.clone()))));

    match action {
        CourseAction::Approve { id } => {
            let course = service
                .approve(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to approve course: {}", e))?;

            println!("{}", "✅ Course published".green().bold());
            println!("  {}", course.title.cyan());
        }
    }

    Ok(())
}

async fn handle_payment_action(action: PaymentAction, pool: &PgPool) -> Result<()> {
    let repo = PgPaymentRepository::new(Arc::new(pool.clone()));

    match action {
        PaymentAction::List { status, limit } => {
            println!(
                "{} {}",
                "💳 Payments:".bright_blue().bold(),
                status.to_string().bright_white()
            );
            println!();

            let payments = repo
                .list_by_status(status, 0, limit)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list payments: {}", e))?;

            if payments.is_empty() {
                println!("{}", "  No payments found".yellow());
                return Ok(());
            }

            for p in &payments {
                println!(
                    "  {}  {:>10.2} {:<4} {:<10} {:<24} {}",
                    p.id.to_string().bright_black(),
                    p.amount,
                    p.currency,
                    p.payment_method.to_string(),
                    p.transaction_id.cyan(),
                    p.created_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black()
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let published: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE is_published")
        .fetch_one(pool)
        .await?;

    let enrollments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
        .fetch_one(pool)
        .await?;

    let pending: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM payments WHERE status = 'pending_verification'",
    )
    .fetch_one(pool)
    .await?;

    let sessions: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sessions
         WHERE revoked_at IS NULL AND (expires_at IS NULL OR expires_at > NOW())",
    )
    .fetch_one(pool)
    .await?;

    println!("  Users:             {}", users.to_string().bright_green().bold());
    println!("  Published courses: {}", published.to_string().bright_green().bold());
    println!("  Enrollments:       {}", enrollments.to_string().bright_green().bold());
    println!("  Pending payments:  {}", pending.to_string().bright_yellow().bold());
    println!("  Active sessions:   {}", sessions.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

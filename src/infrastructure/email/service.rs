//! Mailer trait and error types.

use async_trait::async_trait;
use serde::Serialize;

/// Errors that can occur while sending email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A single outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Sends transactional email.
///
/// Callers treat delivery as best-effort: failures are retried by the
/// notification worker and then logged, never surfaced to API clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;

    /// Returns true if messages are actually delivered.
    fn is_enabled(&self) -> bool;
}

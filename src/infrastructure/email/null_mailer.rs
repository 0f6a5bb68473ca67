//! No-op mailer for environments without an email provider.

use super::service::{MailError, Mailer, OutgoingEmail};
use async_trait::async_trait;
use tracing::{debug, info};

/// A mailer that logs messages instead of sending them.
///
/// Used when `EMAIL_API_KEY` is not set (local development, tests).
pub struct NullMailer;

impl NullMailer {
    pub fn new() -> Self {
        debug!("Using NullMailer (email delivery disabled)");
        Self
    }
}

impl Default for NullMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, "Email delivery disabled, message not sent");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

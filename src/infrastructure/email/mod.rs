//! Transactional email delivery.
//!
//! Provides a [`Mailer`] trait with two implementations:
//! - [`HttpMailer`] - Resend-compatible HTTP API client
//! - [`NullMailer`] - Logging no-op used when no API key is configured

mod http_mailer;
mod messages;
mod null_mailer;
mod service;

pub use http_mailer::HttpMailer;
pub use messages::congratulations_email;
pub use null_mailer::NullMailer;
pub use service::{MailError, Mailer, OutgoingEmail};

#[cfg(test)]
pub use service::MockMailer;

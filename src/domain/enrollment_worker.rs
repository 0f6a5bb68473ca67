//! Background worker for enrollment side effects.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::enrollment_event::EnrollmentEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::infrastructure::email::{Mailer, congratulations_email};

/// Retry policy for each side effect.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// First delay in milliseconds; doubles on every retry.
    pub base_delay_ms: u64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 200,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms.max(1) / 2)
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries)
    }
}

/// Consumes enrollment events until every sender is dropped.
///
/// For each event: records the `enrollment_created` analytics event, then
/// sends the congratulations email when an address is known. Effects are
/// independent; a failed analytics write does not skip the email.
pub async fn run_enrollment_worker<A>(
    mut rx: mpsc::Receiver<EnrollmentEvent>,
    analytics: Arc<A>,
    mailer: Arc<dyn Mailer>,
    policy: RetryPolicy,
    app_url: String,
) where
    A: AnalyticsRepository + ?Sized,
{
    tracing::info!("Enrollment worker started");

    while let Some(event) = rx.recv().await {
        process_event(&event, analytics.as_ref(), mailer.as_ref(), policy, &app_url).await;
    }

    tracing::info!("Enrollment worker stopped");
}

async fn process_event<A>(
    event: &EnrollmentEvent,
    analytics: &A,
    mailer: &dyn Mailer,
    policy: RetryPolicy,
    app_url: &str,
) where
    A: AnalyticsRepository + ?Sized,
{
    let analytics_event = event.to_analytics_event();
    let recorded = Retry::spawn(policy.strategy(), || {
        analytics.record(analytics_event.clone())
    })
    .await;

    if let Err(e) = recorded {
        tracing::error!(
            enrollment_id = %event.enrollment_id,
            error = %e,
            "Failed to record enrollment analytics event"
        );
    }

    let Some(email) = congratulations_email(event, app_url) else {
        tracing::debug!(enrollment_id = %event.enrollment_id, "No email address, skipping congratulations email");
        return;
    };

    let sent = Retry::spawn(policy.strategy(), || mailer.send(email.clone())).await;

    match sent {
        Ok(()) => tracing::info!(
            enrollment_id = %event.enrollment_id,
            to = %email.to,
            "Congratulations email sent"
        ),
        Err(e) => tracing::error!(
            enrollment_id = %event.enrollment_id,
            error = %e,
            "Failed to send congratulations email"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment_event::{EnrollmentNotifier, EnrollmentSource};
    use crate::domain::repositories::MockAnalyticsRepository;
    use crate::error::AppError;
    use crate::infrastructure::email::{MailError, MockMailer};
    use serde_json::json;
    use uuid::Uuid;

    fn fast_policy(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay_ms: 2,
            max_delay: Duration::from_millis(5),
        }
    }

    fn event(email: Option<&str>) -> EnrollmentEvent {
        EnrollmentEvent {
            enrollment_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_email: email.map(str::to_string),
            user_name: None,
            course_id: Uuid::new_v4(),
            course_title: "Rust".to_string(),
            source: EnrollmentSource::Free,
            amount: None,
            currency: None,
        }
    }

    #[tokio::test]
    async fn test_records_analytics_and_sends_email() {
        let mut analytics = MockAnalyticsRepository::new();
        analytics.expect_record().times(1).returning(|_| Ok(()));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| email.to == "s@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let (notifier, rx) = EnrollmentNotifier::channel(4);
        notifier.notify(event(Some("s@example.com")));
        drop(notifier);

        run_enrollment_worker(
            rx,
            Arc::new(analytics),
            Arc::new(mailer),
            fast_policy(2),
            "https://app".to_string(),
        )
        .await;
    }

    #[tokio::test]
    async fn test_retries_then_gives_up() {
        let mut analytics = MockAnalyticsRepository::new();
        analytics
            .expect_record()
            .times(3)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(3).returning(|_| {
            Err(MailError::Rejected {
                status: 503,
                body: String::new(),
            })
        });

        process_event(
            &event(Some("s@example.com")),
            &analytics,
            &mailer,
            fast_policy(2),
            "https://app",
        )
        .await;
    }

    #[tokio::test]
    async fn test_transient_failure_recovers() {
        let mut analytics = MockAnalyticsRepository::new();
        let mut seq = mockall::Sequence::new();
        analytics
            .expect_record()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        analytics
            .expect_record()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        process_event(&event(None), &analytics, &mailer, fast_policy(3), "https://app").await;
    }
}

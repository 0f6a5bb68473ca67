//! Enrollment side-effect event.

use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::domain::entities::Enrollment;
use crate::domain::repositories::NewAnalyticsEvent;

pub const ENROLLMENT_CREATED: &str = "enrollment_created";

/// How the student got into the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentSource {
    Free,
    Stripe,
    Manual,
}

/// A newly created enrollment, with the denormalized data the worker needs
/// to record analytics and send the congratulations email without further
/// lookups.
#[derive(Debug, Clone)]
pub struct EnrollmentEvent {
    pub enrollment_id: Uuid,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub course_id: Uuid,
    pub course_title: String,
    pub source: EnrollmentSource,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl EnrollmentEvent {
    /// Creates an event without a recipient; no email will be sent for it
    /// unless [`Self::with_recipient`] is applied.
    pub fn new(
        enrollment: &Enrollment,
        course_title: impl Into<String>,
        source: EnrollmentSource,
    ) -> Self {
        Self {
            enrollment_id: enrollment.id,
            user_id: enrollment.user_id,
            user_email: None,
            user_name: None,
            course_id: enrollment.course_id,
            course_title: course_title.into(),
            source,
            amount: enrollment.amount_paid,
            currency: enrollment.currency.clone(),
        }
    }

    pub fn with_recipient(mut self, email: impl Into<String>, name: Option<String>) -> Self {
        self.user_email = Some(email.into());
        self.user_name = name;
        self
    }

    pub fn to_analytics_event(&self) -> NewAnalyticsEvent {
        NewAnalyticsEvent {
            name: ENROLLMENT_CREATED.to_string(),
            user_id: Some(self.user_id),
            course_id: Some(self.course_id),
            properties: json!({
                "enrollment_id": self.enrollment_id,
                "course_title": self.course_title,
                "source": self.source,
                "amount": self.amount,
                "currency": self.currency,
            }),
        }
    }
}

/// Producer side of the side-effect queue.
///
/// Never blocks: if the queue is full or the worker is gone the event is
/// dropped with a log line, and the caller's response is unaffected.
#[derive(Clone)]
pub struct EnrollmentNotifier {
    sender: mpsc::Sender<EnrollmentEvent>,
}

impl EnrollmentNotifier {
    pub fn new(sender: mpsc::Sender<EnrollmentEvent>) -> Self {
        Self { sender }
    }

    /// Creates a notifier and the receiver to hand to the worker.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EnrollmentEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    pub fn notify(&self, event: EnrollmentEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    enrollment_id = %event.enrollment_id,
                    "Notification queue full, dropping enrollment event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                tracing::error!(
                    enrollment_id = %event.enrollment_id,
                    "Notification worker stopped, dropping enrollment event"
                );
            }
        }
    }

    /// Returns true while the worker is still receiving.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Free slots left in the queue.
    pub fn available_capacity(&self) -> usize {
        self.sender.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PaymentProvider;
    use chrono::Utc;

    fn enrollment() -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            enrolled_at: Utc::now(),
            payment_provider: Some(PaymentProvider::Stripe),
            payment_reference: Some("pi_1".to_string()),
            amount_paid: Some(49.99),
            currency: Some("USD".to_string()),
        }
    }

    fn event() -> EnrollmentEvent {
        EnrollmentEvent::new(&enrollment(), "Rust", EnrollmentSource::Stripe)
    }

    #[test]
    fn test_event_carries_payment_and_recipient() {
        let ev = event().with_recipient("s@example.com", Some("Sara".to_string()));

        assert_eq!(ev.user_email.as_deref(), Some("s@example.com"));
        assert_eq!(ev.user_name.as_deref(), Some("Sara"));
        assert_eq!(ev.amount, Some(49.99));
        assert_eq!(ev.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_analytics_event_payload() {
        let ev = event();
        let analytics = ev.to_analytics_event();

        assert_eq!(analytics.name, ENROLLMENT_CREATED);
        assert_eq!(analytics.course_id, Some(ev.course_id));
        assert_eq!(analytics.properties["source"], "stripe");
        assert_eq!(analytics.properties["currency"], "USD");
    }

    #[tokio::test]
    async fn test_notify_delivers_to_receiver() {
        let (notifier, mut rx) = EnrollmentNotifier::channel(4);
        let ev = event();

        notifier.notify(ev.clone());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.enrollment_id, ev.enrollment_id);
    }

    #[tokio::test]
    async fn test_notify_drops_when_full() {
        let (notifier, mut rx) = EnrollmentNotifier::channel(1);

        notifier.notify(event());
        notifier.notify(event());

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
        assert_eq!(notifier.available_capacity(), 1);
    }

    #[test]
    fn test_notify_after_worker_stopped_does_not_panic() {
        let (notifier, rx) = EnrollmentNotifier::channel(1);
        drop(rx);

        notifier.notify(event());
        assert!(!notifier.is_running());
    }
}

//! Notification sender that records what it was asked to send.
//!
//! Used by handler and integration tests. Can be told to fail so that
//! best-effort notification paths can be exercised.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp};
use crate::ports::NotificationSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedNotification {
    Welcome {
        to: String,
        first_name: String,
    },
    PaymentConfirmation {
        to: String,
        first_name: String,
        amount: Money,
        transaction_id: String,
    },
    WorkoutReminder {
        to: String,
        first_name: String,
        session_time: Timestamp,
    },
}

#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<RecordedNotification>>,
    failing: Mutex<bool>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent send fail with `NotificationFailed`.
    pub fn fail_all(&self) {
        *lock(&self.failing) = true;
    }

    pub fn sent(&self) -> Vec<RecordedNotification> {
        lock(&self.sent).clone()
    }

    fn record(&self, notification: RecordedNotification) -> Result<(), DomainError> {
        if *lock(&self.failing) {
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                "Notification delivery failed",
            ));
        }
        lock(&self.sent).push(notification);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_welcome(&self, to: &str, first_name: &str) -> Result<(), DomainError> {
        self.record(RecordedNotification::Welcome {
            to: to.to_string(),
            first_name: first_name.to_string(),
        })
    }

    async fn send_payment_confirmation(
        &self,
        to: &str,
        first_name: &str,
        amount: &Money,
        transaction_id: &str,
    ) -> Result<(), DomainError> {
        self.record(RecordedNotification::PaymentConfirmation {
            to: to.to_string(),
            first_name: first_name.to_string(),
            amount: amount.clone(),
            transaction_id: transaction_id.to_string(),
        })
    }

    async fn send_workout_reminder(
        &self,
        to: &str,
        first_name: &str,
        session_time: &Timestamp,
    ) -> Result<(), DomainError> {
        self.record(RecordedNotification::WorkoutReminder {
            to: to.to_string(),
            first_name: first_name.to_string(),
            session_time: *session_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_order() {
        let sender = RecordingNotificationSender::new();
        sender.send_welcome("a@example.com", "A").await.unwrap();
        sender
            .send_workout_reminder("a@example.com", "A", &Timestamp::now())
            .await
            .unwrap();

        let sent = sender.sent();
        assert_eq!(sent.len(), 2);
        assert!(matches!(sent[0], RecordedNotification::Welcome { .. }));
    }

    #[tokio::test]
    async fn fail_all_reports_notification_failed() {
        let sender = RecordingNotificationSender::new();
        sender.fail_all();

        let err = sender.send_welcome("a@example.com", "A").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationFailed);
        assert!(sender.sent().is_empty());
    }
}

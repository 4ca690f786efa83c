//! Notification sender that only logs.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Money, Timestamp};
use crate::ports::NotificationSender;

/// Logs every notification at `info` and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationSender;

impl LoggingNotificationSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn send_welcome(&self, to: &str, first_name: &str) -> Result<(), DomainError> {
        tracing::info!(to = %to, first_name = %first_name, "Welcome notification");
        Ok(())
    }

    async fn send_payment_confirmation(
        &self,
        to: &str,
        first_name: &str,
        amount: &Money,
        transaction_id: &str,
    ) -> Result<(), DomainError> {
        tracing::info!(
            to = %to,
            first_name = %first_name,
            amount = %amount,
            transaction_id = %transaction_id,
            "Payment confirmation notification"
        );
        Ok(())
    }

    async fn send_workout_reminder(
        &self,
        to: &str,
        first_name: &str,
        session_time: &Timestamp,
    ) -> Result<(), DomainError> {
        tracing::info!(
            to = %to,
            first_name = %first_name,
            session_time = %session_time,
            "Workout reminder notification"
        );
        Ok(())
    }
}
